//! Doubles the numbers given on the command line on the GPU.
//!
//! `doubler 1 2 3.5` prints `2 4 7`. Without arguments, 0..16 is used.

use anyhow::{Context, Result};
use wgpu_lite::logging::{init_logging, LoggingConfig};
use wgpu_lite::{Session, SessionConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let input = parse_input(std::env::args().skip(1))?;

    let session = init_session()?;
    let output = session.compute(output_count(input.len())?, Some(&input))?;

    log::info!("doubled {} value(s) on {}", output.len(), session.gpu().adapter_info().name);
    let line: Vec<String> = output.iter().map(f32::to_string).collect();
    println!("{}", line.join(" "));
    Ok(())
}

fn init_session() -> Result<Session<'static>> {
    let shader = include_str!("../shaders/doubler.wgsl");
    let config = SessionConfig {
        label: "doubler".into(),
        ..Default::default()
    };
    pollster::block_on(Session::init_compute(shader, true, config))
}

fn parse_input(args: impl Iterator<Item = String>) -> Result<Vec<f32>> {
    let values = args
        .map(|a| a.parse::<f32>().with_context(|| format!("not a number: {a:?}")))
        .collect::<Result<Vec<_>>>()?;

    if values.is_empty() {
        return Ok((0..16).map(|i| i as f32).collect());
    }
    Ok(values)
}

fn output_count(len: usize) -> Result<u32> {
    u32::try_from(len).with_context(|| format!("{len} inputs exceed the u32 dispatch range"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_input(args(&["1", "2", "3.5"])).unwrap(), vec![1.0, 2.0, 3.5]);
    }

    #[test]
    fn defaults_to_a_range() {
        let values = parse_input(args(&[])).unwrap();
        assert_eq!(values.len(), 16);
        assert_eq!(values[15], 15.0);
    }

    #[test]
    fn output_count_fits_u32() {
        assert_eq!(output_count(3).unwrap(), 3);
        assert_eq!(output_count(u32::MAX as usize).unwrap(), u32::MAX);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn output_count_rejects_overflow() {
        let err = output_count(u32::MAX as usize + 1).unwrap_err();
        assert!(err.to_string().contains("exceed"));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_input(args(&["1", "two"])).unwrap_err();
        assert!(err.to_string().contains("two"));
    }
}
