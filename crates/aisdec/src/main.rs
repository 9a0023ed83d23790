//! Command line AIS decoder.
//!
//! Reads interleaved unsigned 8-bit I/Q samples at 300 kHz centered on
//! 162.000 MHz and prints decoded AIS reports, one per line.
//!
//! # Usage Examples
//!
//! ## Live from rtl_tcp
//! ```bash
//! rtl_tcp -f 162e6 -s 300000 -a 127.0.0.1 -p 2345 -g 48.0
//! aisdec
//! ```
//!
//! ## Recorded capture
//! ```bash
//! aisdec --source file --file capture.iq
//! ```
//!
//! ## Piped input
//! ```bash
//! cat capture.iq | aisdec --source stdin
//! ```

use clap::{ArgAction, Parser, ValueEnum};
use tracing::{error, info};

use aisrx::{AisReceiver, FRAME_SAMPLES, SampleSource};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceType {
    RtlTcp,
    File,
    Stdin,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "AIS decoder for RTL-SDR I/Q streams", long_about = None)]
struct Args {
    /// Source type: rtl-tcp, file, or stdin
    #[arg(long, default_value = "rtl-tcp")]
    source: SourceType,

    /// rtl_tcp server address
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// rtl_tcp server port
    #[arg(short, long, default_value_t = 2345)]
    port: u16,

    /// Input file path (required when source=file)
    #[arg(long)]
    file: Option<String>,

    /// Verbosity level (-v=info, -vv=debug, -vvv=trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> aisrx::Result<()> {
    let args = Args::parse();

    // 0 = WARN (quiet), 1 = INFO, 2 = DEBUG, 3+ = TRACE
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();

    let source = match args.source {
        SourceType::RtlTcp => {
            SampleSource::from_rtl_tcp(&args.host, args.port, FRAME_SAMPLES).map_err(|e| {
                error!(
                    "connection to {}:{} failed; is rtl_tcp running? \
                     (rtl_tcp -f 162e6 -s 300000 -a {} -p {} -g 48.0)",
                    args.host, args.port, args.host, args.port
                );
                e
            })?
        }
        SourceType::File => {
            let path = args
                .file
                .as_deref()
                .ok_or_else(|| aisrx::Error::source("--file is required when source=file"))?;
            SampleSource::from_file(path, FRAME_SAMPLES)?
        }
        SourceType::Stdin => SampleSource::from_stdin(FRAME_SAMPLES),
    };

    info!(source = ?args.source, "starting AIS receiver");
    let mut receiver = AisReceiver::new();
    let stdout = std::io::stdout();
    receiver.run(source, &mut stdout.lock())?;
    Ok(())
}
