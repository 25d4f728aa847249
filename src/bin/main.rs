use clap::clap_app;
use log::{error, info, LevelFilter};
use std::{error, process::exit};

use lyricast::{bot::Router, random::Entropy, telegram::Telegram, yt::YouTube, Config};

mod lylog {
    use chrono::Utc;
    use log::{max_level, Log, Metadata, Record};

    pub struct LyricLogger;

    /// `{timestamp} - {level} - {message}`
    pub fn line(record: &Record) -> String {
        format!("{} - {} - {}", Utc::now(), record.level(), record.args())
    }

    impl Log for LyricLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= max_level()
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                println!("{}", line(record));
            }
        }

        fn flush(&self) {}
    }

}

static LOGGER: lylog::LyricLogger = lylog::LyricLogger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<(dyn error::Error + 'static)>> {
    let matches = clap_app!(lyricast =>
        (version: "0.0.1")
        (author: "krashanoff <leo@krashanoff.com>")
        (about: "Finds songs from lyrics and drafts YouTube Shorts metadata, over Telegram.")
        (@arg verbose: -v ... "Increases program verbosity")
        (@arg mode: -m --mode +takes_value "How plain messages are answered. Defaults to `metadata`.")
        (@arg timeout: -t --timeout +takes_value "Seconds to wait for YouTube before degrading. Defaults to 10.")
        (@arg seed: --seed +takes_value "Seeds the random source for reproducible metadata")
    )
    .get_matches();

    if let Err(e) = log::set_logger(&LOGGER).map(|()| {
        log::set_max_level(match matches.occurrences_of("verbose") {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
    }) {
        panic!("Failed to initialize logger! {}", e)
    }

    // Credentials are checked before any client exists, so a bad
    // environment never reaches the network.
    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            exit(1)
        }
    };
    if let Some(secs) = matches.value_of("timeout") {
        config = config.with_timeout_secs(secs)?;
    }
    if let Some(mode) = matches.value_of("mode") {
        config = config.with_mode(mode)?;
    }
    if let Some(seed) = matches.value_of("seed") {
        config = config.with_seed(seed)?;
    }

    let youtube = YouTube::new(&config);
    let router = Router::new(youtube.clone(), youtube, config.default_mode);
    let telegram = Telegram::new(&config.telegram_token, config.timeout);
    let mut rng = Entropy::from_seed(config.seed);

    info!(
        "Answering plain messages in {} mode, {:?} provider timeout",
        router.mode(),
        config.timeout
    );
    telegram.run(&router, &mut rng).await;

    Ok(())
}
