mod args;
pub mod config;
pub mod mcp;

pub use args::Cli;

use ampmcp_client::Client;
use anyhow::Result;

use crate::mcp::prompts::PromptRegistry;

pub async fn run(cli: Cli) -> Result<()> {
    let credentials = config::resolve_credentials(&cli)?;
    let client = Client::new(credentials);

    let mut prompts = PromptRegistry::builtin();
    if let Some(dir) = config::resolve_prompts_dir(&cli) {
        prompts.load_project_prompts(&dir);
    }

    mcp::run_server(client, prompts).await
}
