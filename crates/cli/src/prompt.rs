//! Interactive checkout confirmation.

use std::io::{self, BufRead, Write};

use webshop_client::{Cart, Confirm};

use crate::render;

/// Asks on a terminal before an order is placed.
///
/// Shows the cart and reads one line; only `y`/`yes` approve. Read errors
/// count as a refusal.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl PromptConfirm<io::StdinLock<'static>, io::Stderr> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, cart: &Cart) -> io::Result<bool> {
        render::cart(&mut self.output, cart)?;
        write!(self.output, "Confirm purchase? [y/N] ")?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, cart: &Cart) -> bool {
        self.ask(cart).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read confirmation");
            false
        })
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
