//! Copy-paste flow: Google shows the code on screen and the user pastes it.

use std::io::Write;

use anyhow::Context;
use gsc_core::auth::{obtain_refresh_token, OAuthProvider, OOB_REDIRECT_URI, SEARCH_CONSOLE_SCOPES};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::output;

pub async fn run<P: OAuthProvider>(provider: &P) -> anyhow::Result<String> {
    let url = provider.authorize_url(SEARCH_CONSOLE_SCOPES, OOB_REDIRECT_URI);
    output::print_consent_prompt(&url);
    println!("3. Copy the authorization code and paste it below\n");
    print!("Enter the authorization code: ");
    std::io::stdout().flush()?;

    let mut stdin = BufReader::new(tokio::io::stdin());
    exchange_pasted(provider, &mut stdin).await
}

/// Read one code from `reader` and exchange it. Nothing is sent when the
/// line is blank.
pub async fn exchange_pasted<P, R>(provider: &P, reader: &mut R) -> anyhow::Result<String>
where
    P: OAuthProvider,
    R: AsyncBufRead + Unpin,
{
    let code = read_code(reader).await?;
    obtain_refresh_token(provider, &code, OOB_REDIRECT_URI)
        .await
        .context("Error exchanging authorization code")
}

async fn read_code<R: AsyncBufRead + Unpin>(reader: &mut R) -> anyhow::Result<String> {
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .await
        .context("failed to read authorization code")?;
    if n == 0 {
        anyhow::bail!("no authorization code entered");
    }

    let code = line.trim();
    if code.is_empty() {
        anyhow::bail!("authorization code is empty");
    }
    Ok(code.to_string())
}
