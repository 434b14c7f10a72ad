//! Interactive front end: asks for the sweep parameters instead of taking
//! them from the command line. Blank answers keep the current value.

use crate::benchmark::SweepConfig;
use crate::error::ConfigError;
use std::io::{BufRead, Write};

pub fn prompt_config<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    base: SweepConfig,
) -> Result<SweepConfig, ConfigError> {
    let mut config = base;

    if let Some(answer) = ask(input, output, "Benchmark mode", &config.mode.to_string())? {
        config.mode = parse_number("mode", &answer)?;
    }
    if let Some(answer) = ask(
        input,
        output,
        "Number of DPUs",
        &config.device_count.to_string(),
    )? {
        config.device_count = parse_number("device count", &answer)?;
    }
    if let Some(answer) = ask(
        input,
        output,
        "Number of tasklets (comma separated)",
        &join(&config.tasklets),
    )? {
        config.tasklets = parse_u32_list("tasklets", &answer)?;
    }
    if let Some(answer) = ask(
        input,
        output,
        "Benchmark duration in seconds",
        &config.duration_seconds.to_string(),
    )? {
        config.duration_seconds = parse_number("duration", &answer)?;
    }

    config.validate()?;
    Ok(config)
}

/// Parse `"1, 2,4"` into `[1, 2, 4]`. A blank value is the empty list;
/// empty items inside a list are rejected.
pub fn parse_u32_list(field: &'static str, value: &str) -> Result<Vec<u32>, ConfigError> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|item| {
            item.trim().parse::<u32>().map_err(|_| ConfigError::List {
                field,
                value: value.to_string(),
            })
        })
        .collect()
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Value {
        field,
        value: value.to_string(),
    })
}

// None on a blank answer or end of input.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    current: &str,
) -> Result<Option<String>, ConfigError> {
    write!(output, "{question} [{current}]: ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

fn join(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(answers: &str) -> Result<(SweepConfig, String), ConfigError> {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let config = prompt_config(&mut input, &mut output, SweepConfig::default())?;
        Ok((config, String::from_utf8(output).unwrap()))
    }

    #[test]
    fn test_prompt_fills_config() {
        let (config, transcript) = run("1\n4\n1,2,4\n30\n").unwrap();
        assert_eq!(config.mode, 1);
        assert_eq!(config.device_count, 4);
        assert_eq!(config.tasklets, vec![1, 2, 4]);
        assert_eq!(config.duration_seconds, 30);
        assert!(transcript.contains("Number of DPUs [1]: "));
    }

    #[test]
    fn test_blank_answers_keep_defaults() {
        let (config, _) = run("\n\n\n\n").unwrap();
        let defaults = SweepConfig::default();
        assert_eq!(config.mode, defaults.mode);
        assert_eq!(config.device_count, defaults.device_count);
        assert_eq!(config.tasklets, defaults.tasklets);
        assert_eq!(config.duration_seconds, defaults.duration_seconds);
    }

    #[test]
    fn test_end_of_input_keeps_defaults() {
        let (config, _) = run("0\n").unwrap();
        assert_eq!(config.mode, 0);
        assert_eq!(config.device_count, 1);
    }

    #[test]
    fn test_bad_answers_are_errors() {
        assert!(matches!(run("x\n"), Err(ConfigError::Value { .. })));
        assert!(matches!(run("0\n1\n1,,2\n"), Err(ConfigError::List { .. })));
        assert!(matches!(run("0\n0\n"), Err(ConfigError::Zero { .. })));
    }

    #[test]
    fn test_parse_u32_list() {
        assert_eq!(parse_u32_list("tasklets", " 1, 2,4 ").unwrap(), vec![1, 2, 4]);
        assert_eq!(parse_u32_list("tasklets", "").unwrap(), Vec::<u32>::new());
        assert_eq!(parse_u32_list("tasklets", "  ").unwrap(), Vec::<u32>::new());
        assert!(parse_u32_list("tasklets", "1,").is_err());
        assert!(parse_u32_list("tasklets", "1;2").is_err());
    }
}
