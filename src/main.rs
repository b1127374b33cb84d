#[cfg(feature = "serial")]
use std::io::BufRead;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tosscue::engine::{Report, Reporter, SessionSummary};
use tosscue::synth::render_default_cues;
#[cfg(feature = "serial")]
use tosscue::transport::{parse_choice, PortChooser, PortInfo};
use tosscue::{
    AudioSink, CancelToken, Config, CueLibrary, CuePlayer, EventLoop, LineReader, LineSource,
    Outcome, ProtocolMode, RecordingSink, ToneSynth, TossCueError,
};

const RULE: &str = "==================================================";
const THIN_RULE: &str = "--------------------------------------------------";

#[derive(Parser, Debug)]
#[command(name = "tosscue")]
#[command(about = "Play audio cues for ball-toss game events received over serial")]
struct Args {
    /// Event protocol spoken by the controller
    #[arg(short, long, value_enum)]
    mode: Option<ProtocolMode>,

    /// Serial port to open (skips auto-detection)
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the sound assets
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Read controller output from a capture file instead of a serial port
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Do not open the audio device; cues are only logged
    #[arg(long)]
    mute: bool,

    /// List serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Write the fallback tone cues as WAV files into DIR and exit
    #[arg(long, value_name = "DIR")]
    render_cues: Option<PathBuf>,

    /// Overwrite existing files with --render-cues
    #[arg(long)]
    overwrite: bool,
}

impl Args {
    fn resolve_config(&self) -> tosscue::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(port) = &self.port {
            config.port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(assets) = &self.assets {
            config.asset_dir = assets.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Prompts on the console for a port index
#[cfg(feature = "serial")]
struct ConsoleChooser;

#[cfg(feature = "serial")]
impl PortChooser for ConsoleChooser {
    fn choose(&mut self, candidates: &[PortInfo]) -> Option<String> {
        println!("\nCouldn't auto-detect the controller. Manual selection required.");
        println!("\nPlease select the controller port:");
        print_ports(candidates);
        print!("\nEnter port number: ");
        io::stdout().flush().ok();

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input).is_err() {
            println!("Invalid input!");
            return None;
        }
        match parse_choice(&input, candidates.len()) {
            Some(index) => Some(candidates[index].name.clone()),
            None => {
                println!("Invalid selection!");
                None
            }
        }
    }
}

/// Game console output
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, report: &Report) {
        match report {
            Report::Debug(text) => println!("{}", text),
            Report::Scoring { points } => println!("\n>>> SCORED {} POINTS!", points),
            Report::Fallback { label } => println!("{}", label),
            Report::Scored { state, .. } => println!("{}\n", state),
            Report::Hit { outcome } => {
                let name = match outcome {
                    Outcome::Good => "GOOD",
                    Outcome::Bad => "BAD",
                };
                println!("\n>>> {} HIT!", name);
            }
            Report::Outcome { .. } => println!(),
            Report::Malformed { reason, .. } => println!("Error parsing points: {}", reason),
        }
        io::stdout().flush().ok();
    }

    fn finished(&mut self, summary: &SessionSummary) {
        println!("\n\n{RULE}");
        println!("GAME OVER!");
        println!("{RULE}");
        if let Some(score) = summary.score {
            println!("Final Score: {} points", score.total_score);
            println!("Total Throws: {}", score.throw_count);
            if score.has_throws() {
                println!("Average Points per Throw: {:.1}", score.average());
            }
            println!("{RULE}");
        }
        println!("\nShutting down...");
    }
}

#[cfg(feature = "serial")]
fn print_ports(ports: &[PortInfo]) {
    for (i, port) in ports.iter().enumerate() {
        println!("  [{}] {}", i, port);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn print_banner(config: &Config) {
    println!("{RULE}");
    println!("Ball Toss Game - Sound Player");
    println!("{RULE}");
    match config.mode {
        ProtocolMode::Scoring => println!("Points System: 25, 50, 75, or 100 points per throw"),
        ProtocolMode::Outcome => println!("Hit System: GOOD or BAD per throw"),
    }
    println!("{RULE}");
}

#[cfg(feature = "serial")]
fn open_transport(config: &Config) -> tosscue::Result<Box<dyn LineSource>> {
    use tosscue::transport::{list_ports, select_port, SerialTransport};

    let port = match &config.port {
        Some(port) => port.clone(),
        None => {
            let ports = list_ports()?;
            println!("Available serial ports:");
            print_ports(&ports);
            let port = select_port(&ports, config.port_keywords.as_slice(), &mut ConsoleChooser)?;
            println!("\nUsing port: {}", port);
            port
        }
    };

    let transport = SerialTransport::open(&port, config.baud_rate, config.read_timeout())?;
    println!("Connected to {} at {} baud", port, config.baud_rate);
    Ok(Box::new(transport))
}

#[cfg(not(feature = "serial"))]
fn open_transport(_config: &Config) -> tosscue::Result<Box<dyn LineSource>> {
    Err(TossCueError::TransportUnavailable(
        "serial support not built; rebuild with `--features serial` or use --replay".into(),
    ))
}

#[cfg(feature = "serial")]
fn list_serial_ports() -> tosscue::Result<()> {
    let ports = tosscue::transport::list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found!");
    } else {
        println!("Available serial ports:");
        print_ports(&ports);
    }
    Ok(())
}

#[cfg(not(feature = "serial"))]
fn list_serial_ports() -> tosscue::Result<()> {
    Err(TossCueError::TransportUnavailable(
        "serial support not built; rebuild with `--features serial`".into(),
    ))
}

fn listen<S: AudioSink>(
    config: &Config,
    sink: S,
    source: &mut dyn LineSource,
    cancel: CancelToken,
) -> SessionSummary {
    let library = CueLibrary::with_defaults(config.mode, &config.asset_dir);
    let synth = ToneSynth::new(config.sample_rate, config.channels);
    let player = CuePlayer::with_synth(library, synth, sink);
    let mut event_loop = EventLoop::new(player, cancel).with_idle_backoff(config.idle_backoff());

    println!("\nListening for game events...");
    println!("{THIN_RULE}");
    event_loop.run(source, &mut ConsoleReporter)
}

fn run_session(config: &Config, args: &Args) -> anyhow::Result<SessionSummary> {
    // Until the handler is installed, Ctrl-C at the port prompt ends the process
    let (mut source, settle): (Box<dyn LineSource>, bool) = match &args.replay {
        Some(path) => {
            let file = std::fs::File::open(path)
                .map_err(|e| TossCueError::TransportUnavailable(format!("{}: {}", path.display(), e)))?;
            println!("Replaying controller output from {}", path.display());
            let replay: Box<dyn LineSource> = Box::new(LineReader::new(file));
            (replay, false)
        }
        None => (open_transport(config)?, true),
    };

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel()).context("installing interrupt handler")?;

    if settle && cancel.wait(config.settle_delay()) {
        tracing::info!("interrupted while waiting for the controller to settle");
    }

    if args.mute {
        return Ok(listen(config, RecordingSink::new(), &mut *source, cancel));
    }

    #[cfg(feature = "device")]
    let summary = {
        let device = tosscue::RodioDevice::new()?;
        listen(config, device, &mut *source, cancel)
    };

    #[cfg(not(feature = "device"))]
    let summary = {
        tracing::warn!("built without audio device support; cues are muted");
        listen(config, RecordingSink::new(), &mut *source, cancel)
    };

    Ok(summary)
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config = args.resolve_config()?;

    if args.list_ports {
        list_serial_ports()?;
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(dir) = &args.render_cues {
        let library = CueLibrary::tones_only(config.mode);
        let synth = ToneSynth::new(config.sample_rate, config.channels);
        let written = render_default_cues(&synth, &library, dir, args.overwrite)
            .with_context(|| format!("rendering cues into {}", dir.display()))?;
        println!("Wrote {} cue file(s) to {}", written.len(), dir.display());
        return Ok(ExitCode::SUCCESS);
    }

    print_banner(&config);
    let summary = run_session(&config, &args)?;
    Ok(if summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            if let Some(TossCueError::TransportUnavailable(reason)) = err.downcast_ref::<TossCueError>() {
                println!("ERROR: {}", reason);
                println!("\nMake sure:");
                println!("  1. The controller is connected via USB");
                println!("  2. No other serial monitor has the port open");
                println!("  3. You have permission to access the port");
            } else {
                println!("\nERROR: {:#}", err);
            }
            ExitCode::FAILURE
        }
    }
}
