pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod output;

use reqwest::Client;
use tracing::{debug, error, info};

use ncov_stats::new_calendar;

pub use config::Config;
pub use error::{Error, FetchError, FetchErrorKind};

/// Progress of a single run. `Done` is only reached once the calendar has
/// been written; any failure ends in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NotStarted,
    Fetching,
    Done,
    Failed,
}

/// One fetch-build-write cycle.
pub struct Pipeline {
    config: Config,
    client: Client,
    stage: Stage,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self, Error> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .inspect_err(|err| error!("failed to build http client: {err}"))
            .map_err(Error::Client)?;

        Ok(Self {
            config,
            client,
            stage: Stage::NotStarted,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Runs the cycle and returns the serialized calendar that was written.
    ///
    /// The output file is only touched after the whole document has been
    /// built, so a failed run leaves any previous calendar in place.
    pub async fn execute(&mut self) -> Result<String, Error> {
        let result = self.publish().await;
        self.stage = match result {
            Ok(_) => Stage::Done,
            Err(_) => Stage::Failed,
        };
        debug!(stage = ?self.stage, "run finished");
        result
    }

    async fn publish(&mut self) -> Result<String, Error> {
        let mut calendar = new_calendar(&self.config.timezone)
            .inspect_err(|err| error!("{err}"))?;

        self.stage = Stage::Fetching;
        let record =
            fetch::fetch_latest(&self.client, &self.config.endpoint, &self.config.fields).await?;
        info!(
            uid = %record.uid,
            updated_at = %record.updated_at,
            confirmed = record.confirmed,
            "fetched latest statistics"
        );

        calendar.add_event(record.to_ics());
        let serialized = calendar.to_string();

        let path = &self.config.output;
        output::write_atomic(path, serialized.as_bytes())
            .map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })
            .inspect_err(|err| error!("{err}"))?;
        info!(path = %path.display(), "calendar written");

        Ok(serialized)
    }
}

/// Publishes the calendar once and echoes it to stdout.
pub async fn run(config: Config) -> Result<(), Error> {
    let mut pipeline = Pipeline::new(config)?;
    let serialized = pipeline.execute().await?;
    println!("{}", output::display_text(&serialized));
    Ok(())
}
