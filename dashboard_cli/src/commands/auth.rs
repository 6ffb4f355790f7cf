use anyhow::{bail, Result};
use clap::Subcommand;

use super::Context;
use crate::output::{print_key_values, OutputFormat};

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store a bearer token used for every following request
    Login {
        /// Bearer token issued by the backend
        token: String,
    },
    /// Forget the stored token
    Logout,
    /// Show whether a token is stored
    Status,
}

pub fn run(cmd: &AuthCommands, ctx: &Context, format: &OutputFormat) -> Result<()> {
    match cmd {
        AuthCommands::Login { token } => {
            let token = token.trim();
            if token.is_empty() {
                bail!("token cannot be empty");
            }
            ctx.catalog.set_auth_token(token)?;
            eprintln!("Token stored.");
            Ok(())
        }
        AuthCommands::Logout => {
            ctx.catalog.clear_auth_token()?;
            eprintln!("Token cleared.");
            Ok(())
        }
        AuthCommands::Status => {
            let authenticated = ctx.catalog.is_authenticated();
            print_key_values(
                &[
                    ("Authenticated", authenticated.to_string()),
                    ("Client ID", ctx.catalog.client_id()?),
                    ("Environment", ctx.config.environment.to_string()),
                ],
                *format,
            )
        }
    }
}
