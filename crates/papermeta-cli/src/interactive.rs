//! Interactive session: ask for a document count, then one path per document

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::batch::{BatchDriver, BatchReport};

/// Prompt on `output`, read answers from `input`, and process each path as
/// soon as it is entered.
///
/// An unreadable count is an error; running out of input ends the session
/// early with whatever was processed so far.
pub fn run_session<R, W>(
    driver: &mut BatchDriver,
    mut input: R,
    mut output: W,
) -> Result<BatchReport>
where
    R: BufRead,
    W: Write,
{
    write!(output, "How many documents would you like to process? ")?;
    output.flush()?;

    let count = match read_answer(&mut input)? {
        Some(answer) => answer
            .parse::<usize>()
            .with_context(|| format!("invalid document count: {answer:?}"))?,
        None => bail!("no document count given"),
    };

    let mut report = BatchReport::new();
    for i in 1..=count {
        write!(output, "Enter the path of document {i}: ")?;
        output.flush()?;

        let Some(answer) = read_answer(&mut input)? else {
            tracing::warn!(expected = count, entered = i - 1, "input ended early");
            break;
        };

        driver.process_into(&PathBuf::from(answer), &mut report);
    }

    Ok(report.finish())
}

/// Next line with surrounding whitespace removed, or `None` at end of input
fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use papermeta_extractor::{RecordAssembler, RuleBasedEngine};
    use papermeta_parser::ParserRegistry;
    use papermeta_sink::MemorySink;
    use std::sync::Arc;

    fn driver() -> BatchDriver {
        BatchDriver::new(
            ParserRegistry::with_defaults(),
            RecordAssembler::new(Arc::new(RuleBasedEngine::new())),
            Box::new(MemorySink::default()),
        )
    }

    #[test]
    fn test_prompts_for_each_document() {
        let mut out = Vec::new();
        let input = "2\nmissing.pdf\n notes.txt \n".as_bytes();
        let report = run_session(&mut driver(), input, &mut out).unwrap();

        let prompts = String::from_utf8(out).unwrap();
        assert!(prompts.contains("How many documents"));
        assert!(prompts.contains("document 1"));
        assert!(prompts.contains("document 2"));

        assert_eq!(report.processed, 0);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.failures[1].path, PathBuf::from("notes.txt"));
    }

    #[test]
    fn test_early_end_of_input() {
        let input = "3\nmissing.docx\n".as_bytes();
        let report = run_session(&mut driver(), input, Vec::new()).unwrap();
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn test_invalid_count() {
        assert!(run_session(&mut driver(), "three\n".as_bytes(), Vec::new()).is_err());
        assert!(run_session(&mut driver(), "".as_bytes(), Vec::new()).is_err());
    }

    #[test]
    fn test_zero_documents() {
        let report = run_session(&mut driver(), "0\n".as_bytes(), Vec::new()).unwrap();
        assert_eq!(report.total(), 0);
    }
}
