use crate::core::logger::{LogOptions, Logger};
use crate::domain::ports::Output;
use crate::utils::error::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

/// Log every line read from `reader` as its own call. Returns the number of lines.
pub async fn log_lines<R, O>(logger: &Logger<O>, reader: R, options: &LogOptions) -> Result<usize>
where
    R: AsyncRead + Unpin,
    O: Output,
{
    let mut lines = BufReader::new(reader).lines();
    let mut count = 0;

    while let Some(line) = lines.next_line().await? {
        logger.log_strings(vec![line], options)?;
        count += 1;
    }

    tracing::debug!("Logged {} lines from input", count);
    Ok(count)
}

/// Read the whole input, for docstrings piped in.
pub async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text).await?;
    Ok(text)
}
