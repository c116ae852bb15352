use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "ampmcp",
    version,
    about = "MCP server exposing the Amplitude Analytics Dashboard REST API as agent tools"
)]
pub struct Cli {
    /// Amplitude API key (falls back to AMPLITUDE_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Amplitude secret key (falls back to AMPLITUDE_SECRET_KEY)
    #[arg(long)]
    pub secret_key: Option<String>,

    /// Data residency region, 'us' or 'eu' (falls back to AMPLITUDE_REGION, default: us)
    #[arg(long)]
    pub region: Option<String>,

    /// Directory containing supplementary prompt definitions under <dir>/prompts/*.json
    #[arg(long)]
    pub prompts_dir: Option<String>,
}
