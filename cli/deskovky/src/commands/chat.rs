use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use bpaf::Bpaf;
use deskovky_catalog::ClientTrait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, instrument};

use crate::bot::Bot;
use crate::utils::message;

// Answer chat commands read from stdin
#[derive(Debug, Bpaf, Clone)]
pub struct Chat {}

impl Chat {
    #[instrument(name = "chat", skip_all)]
    pub async fn handle<C: ClientTrait>(self, bot: &Bot<C>) -> Result<()> {
        message::plain(format!(
            "Answering commands prefixed with '{}', try '{}help'. Press Ctrl-D to stop.",
            bot.prefix(),
            bot.prefix()
        ));

        let stdin = BufReader::new(tokio::io::stdin());
        let answered = answer_messages(bot, stdin, &mut std::io::stdout()).await?;
        debug!(answered, "chat input closed");
        Ok(())
    }
}

/// Answer every command in `input`, one message per line, until EOF.
///
/// Lines that are not commands are skipped. Returns the number of replies.
async fn answer_messages<C, R, W>(bot: &Bot<C>, input: R, out: &mut W) -> Result<usize>
where
    C: ClientTrait,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut answered = 0;

    while let Some(line) = lines
        .next_line()
        .await
        .context("Could not read chat message")?
    {
        let received = Instant::now();
        let Some(parsed) = bot.parse(&line) else {
            continue;
        };

        if let Some(progress) = parsed.as_ref().ok().and_then(|c| c.progress_message()) {
            writeln!(out, "{progress}")?;
        }
        let reply = bot.respond(parsed, received).await;
        writeln!(out, "{reply}")?;
        out.flush()?;

        answered += 1;
    }

    Ok(answered)
}
