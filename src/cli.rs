use std::env;
use std::process;
use std::time::Duration;

use getopts::Options;
use tracing::error;

use crate::Config;

const ENDPOINT_ENV: &str = "NCOV_ICAL_ENDPOINT";
const OUTPUT_ENV: &str = "NCOV_ICAL_OUTPUT";
const TIMEOUT_ENV: &str = "NCOV_ICAL_TIMEOUT";

#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Run(Config),
    Help(String),
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "e",
        "endpoint",
        "Statistics API to query [Env: NCOV_ICAL_ENDPOINT]",
        "URL",
    );
    opts.optopt(
        "o",
        "output",
        "Path of the generated calendar [Default: public/2019-n-Cov-ical.ics] [Env: NCOV_ICAL_OUTPUT]",
        "PATH",
    );
    opts.optopt(
        "t",
        "timeout",
        "Request timeout, 0 disables it [Default: 30] [Env: NCOV_ICAL_TIMEOUT]",
        "SECONDS",
    );
    opts
}

/// Resolves the run configuration from flags and the environment, exiting
/// the process on `--help` or invalid input.
pub fn parse(args: Vec<String>) -> Config {
    match checked(parse_with(args, |key| env::var(key).ok())) {
        Some(Invocation::Run(config)) => config,
        Some(Invocation::Help(usage)) => {
            println!("{usage}");
            process::exit(0);
        }
        None => process::exit(1),
    }
}

fn checked(result: Result<Invocation, String>) -> Option<Invocation> {
    result.inspect_err(|err| error!("{err}")).ok()
}

/// Flags take precedence over environment variables, which take precedence
/// over [`Config::default`].
pub fn parse_with<F>(args: Vec<String>, lookup: F) -> Result<Invocation, String>
where
    F: Fn(&str) -> Option<String>,
{
    let opts = opts();
    let matches = opts.parse(args).map_err(|fail| fail.to_string())?;

    if matches.opt_present("help") {
        return Ok(Invocation::Help(
            opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))),
        ));
    }

    let mut config = Config::default();

    if let Some(endpoint) = matches.opt_str("endpoint").or_else(|| lookup(ENDPOINT_ENV)) {
        config.endpoint = endpoint;
    }

    if let Some(output) = matches.opt_str("output").or_else(|| lookup(OUTPUT_ENV)) {
        config.output = output.into();
    }

    if let Some(timeout) = matches.opt_str("timeout").or_else(|| lookup(TIMEOUT_ENV)) {
        let secs = timeout
            .parse::<u64>()
            .map_err(|err| format!("Provided value for option 'timeout' is invalid: {err}"))?;
        config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }

    Ok(Invocation::Run(config))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use super::*;

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    fn run(args: Vec<String>, env: &[(&str, &str)]) -> Config {
        let env: HashMap<_, _> = env.iter().copied().collect();
        match parse_with(args, |key| env.get(key).map(|value| value.to_string())) {
            Ok(Invocation::Run(config)) => config,
            other => panic!("expected a run, got {other:?}"),
        }
    }

    #[test]
    fn no_arguments_use_defaults() {
        assert_eq!(run(Vec::new(), &[]), Config::default());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = run(
            Vec::new(),
            &[
                (ENDPOINT_ENV, "http://localhost:9000/overall"),
                (OUTPUT_ENV, "/srv/www/ncov.ics"),
                (TIMEOUT_ENV, "0"),
            ],
        );

        assert_eq!(config.endpoint, "http://localhost:9000/overall");
        assert_eq!(config.output, PathBuf::from("/srv/www/ncov.ics"));
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn flags_override_environment() {
        let config = run(
            args(&["-o", "out.ics", "--timeout", "5"]),
            &[(OUTPUT_ENV, "env.ics"), (TIMEOUT_ENV, "60")],
        );

        assert_eq!(config.output, PathBuf::from("out.ics"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn invalid_input_is_reported() {
        assert!(parse_with(args(&["--timeout", "soon"]), |_| None).is_err());
        assert!(parse_with(args(&["--bogus"]), |_| None).is_err());
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn invalid_timeout_is_logged_as_error() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        let invocation = tracing::subscriber::with_default(subscriber, || {
            checked(parse_with(Vec::new(), |key| {
                (key == TIMEOUT_ENV).then(|| "soon".to_string())
            }))
        });
        assert_eq!(invocation, None);

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(
            logs.contains("Provided value for option 'timeout' is invalid"),
            "{logs}"
        );
    }

    #[test]
    fn help() {
        assert!(matches!(
            parse_with(args(&["-h"]), |_| None),
            Ok(Invocation::Help(usage)) if usage.contains("--endpoint")
        ));
    }
}
