//! Command dispatch.

use crate::command::Command;
use crate::error::HelperError;
use crate::helper::Helper;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Runs one helper command.
///
/// Reads the whole of `input`, decodes it and hands it to `helper`. Only
/// `retrieve` writes to `output`, and only once the backend has succeeded, so
/// a failed call leaves `output` untouched. The input is decoded before the
/// command name is checked.
pub async fn run_helper<H, R, W>(
    helper: &H,
    command: &str,
    input: &mut R,
    output: &mut W,
) -> Result<(), HelperError>
where
    H: Helper + ?Sized,
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut body = Vec::new();
    input.read_to_end(&mut body).await?;

    let message = credential_protocol::decode(&body)?;
    let command: Command = command.parse()?;

    debug!(%command, host = %message.host, "dispatching credential command");

    match command {
        Command::Retrieve => {
            let result = helper
                .retrieve(message)
                .await
                .map_err(HelperError::backend)?;
            let encoded = credential_protocol::encode(&result);
            output.write_all(encoded.as_bytes()).await?;
            output.flush().await?;
        }
        Command::Store => {
            helper.store(message).await.map_err(HelperError::backend)?;
        }
        Command::Erase => {
            helper.erase(message).await.map_err(HelperError::backend)?;
        }
    }

    Ok(())
}
