use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hydro-server-rs",
    version,
    about = "Hydroponic unit sensor ingest and pH alert server"
)]
pub struct Args {
    /// Overrides HYDRO_HTTP_HOST.
    #[arg(long)]
    pub host: Option<String>,
    /// Overrides HYDRO_HTTP_PORT.
    #[arg(long)]
    pub port: Option<u16>,
    #[arg(long, default_value_t = false)]
    pub print_openapi: bool,
}
