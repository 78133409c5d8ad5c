//! Interactive question loop

use std::io::{BufRead, Write};

use tracing::debug;

use crate::domain::{DomainError, QueryEngine};

pub const PROMPT: &str = "Enter Question | or type 'quit' to exit: ";
pub const FAREWELL: &str = "See You Soon";

/// Read questions line by line until `quit` (any case) or end of input
///
/// Lines are forwarded to the engine as typed, minus the line terminator.
pub async fn run_query_loop<R, W>(
    engine: &dyn QueryEngine,
    mut input: R,
    mut output: W,
) -> Result<(), DomainError>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();

    loop {
        write!(output, "{}", PROMPT).map_err(write_error)?;
        output.flush().map_err(write_error)?;

        line.clear();
        let read = input
            .read_line(&mut line)
            .map_err(|e| DomainError::io(format!("Failed to read question: {}", e)))?;

        if read == 0 {
            debug!("End of input");
            writeln!(output).map_err(write_error)?;
            return Ok(());
        }

        let question = strip_line_ending(&line);

        if question.eq_ignore_ascii_case("quit") {
            writeln!(output, "{}", FAREWELL).map_err(write_error)?;
            return Ok(());
        }

        let answer = engine.query(question).await?;
        writeln!(output, "{}", answer.text()).map_err(write_error)?;
    }
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn write_error(err: std::io::Error) -> DomainError {
    DomainError::io(format!("Failed to write output: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::MockQueryEngine;
    use crate::domain::{Answer, SourceNode};
    use std::io::Cursor;

    async fn run(engine: &MockQueryEngine, input: &str) -> (Result<(), DomainError>, String) {
        let mut output = Vec::new();
        let result = run_query_loop(engine, Cursor::new(input.as_bytes()), &mut output).await;
        (result, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_quit_in_any_case_says_goodbye_without_querying() {
        for input in ["quit\n", "QUIT\n", "Quit", "qUiT\r\n"] {
            let mut engine = MockQueryEngine::new();
            engine.expect_query().never();

            let (result, output) = run(&engine, input).await;

            assert!(result.is_ok());
            assert_eq!(output, format!("{}{}\n", PROMPT, FAREWELL));
        }
    }

    #[tokio::test]
    async fn test_question_is_forwarded_verbatim() {
        let mut engine = MockQueryEngine::new();
        engine
            .expect_query()
            .withf(|question: &str| question == "  How long is the warranty? ")
            .times(1)
            .returning(|_| {
                Ok(Answer::new(
                    "The warranty lasts 2 years.",
                    vec![SourceNode::new("terms.txt#0", 0.9, "two (2) years")],
                ))
            });

        let (result, output) = run(&engine, "  How long is the warranty? \nquit\n").await;

        assert!(result.is_ok());
        assert_eq!(
            output,
            format!(
                "{p}The warranty lasts 2 years.\n{p}{f}\n",
                p = PROMPT,
                f = FAREWELL
            )
        );
    }

    #[tokio::test]
    async fn test_quit_with_surrounding_spaces_is_a_question() {
        let mut engine = MockQueryEngine::new();
        engine
            .expect_query()
            .withf(|question: &str| question == " quit")
            .times(1)
            .returning(|_| Ok(Answer::text_only("Empty Response")));

        let (_, output) = run(&engine, " quit\nquit\n").await;

        assert!(output.contains("Empty Response\n"));
        assert!(output.ends_with(&format!("{}\n", FAREWELL)));
    }

    #[tokio::test]
    async fn test_end_of_input_stops_without_farewell() {
        let mut engine = MockQueryEngine::new();
        engine
            .expect_query()
            .times(2)
            .returning(|q| Ok(Answer::text_only(format!("echo: {}", q))));

        let (result, output) = run(&engine, "first\nsecond").await;

        assert!(result.is_ok());
        assert!(output.contains("echo: first\n"));
        assert!(output.contains("echo: second\n"));
        assert!(!output.contains(FAREWELL));
    }

    #[tokio::test]
    async fn test_engine_errors_end_the_loop() {
        let mut engine = MockQueryEngine::new();
        engine
            .expect_query()
            .times(1)
            .returning(|_| Err(DomainError::provider("ollama", "connection refused")));

        let (result, output) = run(&engine, "hello\nquit\n").await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
        assert!(!output.contains(FAREWELL));
    }
}
