use std::path::PathBuf;

use anyhow::{Context, Result};

/// (category, question, answer). A blank category continues the group above;
/// a blank answer is shown as missing.
const SAMPLE: &[(&str, &str, &str)] = &[
    ("Core", "1. What is Node.js?", "A JavaScript runtime built on the V8 engine."),
    ("", "2. What is npm?", ""),
    ("", "3. What is the difference between require and import?", "require is CommonJS and synchronous; import is the ES module syntax and is resolved before execution."),
    ("", "What does package-lock.json pin?", "The exact resolved version of every installed dependency."),
    ("Async", "4. What is the event loop?", "The mechanism that runs queued callbacks once the call stack is empty."),
    ("", "5. What is a Promise?", "An object representing a value that may be available now, later, or never."),
    ("", "6. What is callback hell?", "Deeply nested callbacks that make control flow hard to follow."),
    ("", "7. How does async/await relate to Promises?", ""),
    ("Streams", "8. What are the four kinds of streams?", "Readable, Writable, Duplex and Transform."),
    ("", "9. What is backpressure?", "A slow consumer signalling a fast producer to pause."),
    ("Modules", "10. What is module.exports?", "The object a CommonJS module returns to whoever requires it."),
    ("", "11. What is the module wrapper?", "The function Node wraps every CommonJS module in, providing exports, require, module, __filename and __dirname."),
    ("Errors", "12. How do you handle errors in async code?", "Use try/catch around await, or .catch() on the Promise."),
    ("", "13. What does process.on('uncaughtException') do?", "Registers a last-resort handler for exceptions nothing else caught."),
];

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("index.csv"));

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(["Category", "Question", "Answer"])?;
    for &(category, question, answer) in SAMPLE {
        writer.write_record([category, question, answer])?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {} questions to {}", SAMPLE.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_starts_every_group_with_a_category() {
        assert!(!SAMPLE[0].0.is_empty());
        assert!(SAMPLE.iter().all(|(_, q, _)| !q.trim().is_empty()));
    }

    #[test]
    fn sample_covers_missing_answers_and_unnumbered_questions() {
        assert!(SAMPLE.iter().any(|(_, _, a)| a.is_empty()));
        assert!(SAMPLE
            .iter()
            .any(|(_, q, _)| q.split('.').next().and_then(|p| p.parse::<i64>().ok()).is_none()));
    }
}
