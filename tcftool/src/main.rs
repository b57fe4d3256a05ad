use clap::{Parser, Subcommand};
use colored_json::{Color, ColorMode, Output, Styler, ToColoredJson};
use iab_tcf_encoder::sections::tcfeuv2::core_segment::CoreSegmentEncoder;
use iab_tcf_encoder::sections::tcfeuv2::publisher::PublisherSegmentEncoder;
use iab_tcf_encoder::sections::tcfeuv2::vendors::VendorSegmentEncoder;
use iab_tcf_encoder::sections::tcfeuv2::{
    CmpMetadata, ConsentDecision, TCF_EU_V2_VERSION, TcStringEncoderV2,
};
use iab_tcf_encoder::sections::uspv1::{CanonicalPurposes, PurposeConsents, UsPrivacyEncoder};
use iab_tcf_encoder::sections::{SegmentEncoder, SegmentType};
use iab_tcf_encoder::signals::{ConsentSignals, SignalValue};
use num_traits::FromPrimitive;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a TCF consent request into a TC string
    Tcf {
        /// JSON request file, standard input if missing
        request: Option<PathBuf>,
        /// Encode a single segment (0: core, 1: disclosed vendors, 2: allowed vendors, 3: publisher)
        #[arg(short, long)]
        segment: Option<u8>,
    },
    /// List the segments of the TC string encoded from a TCF consent request
    Segments {
        /// JSON request file, standard input if missing
        request: Option<PathBuf>,
    },
    /// Encode a CCPA consent request into a US Privacy string
    Usp {
        /// JSON request file, standard input if missing
        request: Option<PathBuf>,
    },
    /// Display the device storage entries for a combined consent request
    Signals {
        /// JSON request file, standard input if missing
        request: Option<PathBuf>,
    },
}

#[derive(Deserialize)]
struct TcfRequest {
    version: Option<u8>,
    metadata: CmpMetadata,
    #[serde(default)]
    decision: ConsentDecision,
    #[serde(default)]
    default_consent: bool,
}

impl TcfRequest {
    fn encoder(&self) -> TcStringEncoderV2 {
        TcStringEncoderV2::with_version(
            self.version.unwrap_or(TCF_EU_V2_VERSION),
            self.metadata.clone(),
        )
        .with_default_consent(self.default_consent)
    }
}

#[derive(Deserialize)]
struct UspRequest {
    #[serde(default)]
    canonical_purposes: CanonicalPurposes,
    #[serde(default)]
    consents: PurposeConsents,
    #[serde(default)]
    notice: bool,
    #[serde(default)]
    lspa: bool,
}

impl UspRequest {
    fn encode(&self) -> String {
        UsPrivacyEncoder::new(self.canonical_purposes.clone())
            .encode(&self.consents, self.notice, self.lspa)
            .to_string()
    }
}

#[derive(Deserialize)]
struct SignalsRequest {
    tcf: Option<TcfRequest>,
    usp: Option<UspRequest>,
    #[serde(default)]
    gdpr_applies: bool,
    #[serde(default)]
    us_privacy_applies: bool,
}

fn main() {
    setup_logging();

    let args = Cli::parse();

    let e = match args.cmd {
        Commands::Tcf {
            request,
            segment: None,
        } => encode_tc_string(request),
        Commands::Tcf {
            request,
            segment: Some(t),
        } => encode_tc_segment(request, t),
        Commands::Segments { request } => list_segments(request),
        Commands::Usp { request } => encode_us_privacy_string(request),
        Commands::Signals { request } => display_signals(request),
    };

    if let Err(e) = e {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

fn read_request<T: DeserializeOwned>(path: Option<PathBuf>) -> Result<T, Box<dyn Error>> {
    let request = match path {
        Some(p) if p.as_os_str() != "-" => {
            debug!(path = %p.display(), "reading request");
            serde_json::from_reader(File::open(p)?)?
        }
        _ => {
            debug!("reading request from standard input");
            serde_json::from_reader(io::stdin().lock())?
        }
    };

    Ok(request)
}

fn encode_tc_string(path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let request: TcfRequest = read_request(path)?;

    println!("{}", request.encoder().encode(&request.decision)?);

    Ok(())
}

fn encode_tc_segment(path: Option<PathBuf>, t: u8) -> Result<(), Box<dyn Error>> {
    let request: TcfRequest = read_request(path)?;
    let segment_type = SegmentType::from_u8(t).ok_or("Invalid segment type")?;

    let segment = match segment_type {
        SegmentType::Core => CoreSegmentEncoder::with_version(
            request.version.unwrap_or(TCF_EU_V2_VERSION),
            request.metadata,
        )
        .encode(&request.decision)?,
        SegmentType::DisclosedVendors | SegmentType::AllowedVendors => {
            VendorSegmentEncoder::new(segment_type)?
                .with_default_consent(request.default_consent)
                .encode(&request.decision)?
        }
        SegmentType::PublisherTc => PublisherSegmentEncoder.encode(&request.decision)?,
    };

    println!("{segment}");

    Ok(())
}

fn list_segments(path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let request: TcfRequest = read_request(path)?;

    for s in request.encoder().encode_segments(&request.decision)? {
        println!("{}\t{}\t{}", s.segment_type() as u8, s.segment_type(), s);
    }

    Ok(())
}

fn encode_us_privacy_string(path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let request: UspRequest = read_request(path)?;

    println!("{}", request.encode());

    Ok(())
}

fn display_signals(path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let request: SignalsRequest = read_request(path)?;

    let tc_string = request
        .tcf
        .map(|r| r.encoder().encode(&r.decision))
        .transpose()?;

    let signals = ConsentSignals {
        tc_string,
        gdpr_applies: request.gdpr_applies,
        us_privacy_string: request.usp.map(|r| r.encode()),
        us_privacy_applies: request.us_privacy_applies,
    };

    let entries = signals
        .entries()
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                SignalValue::String(s) => serde_json::Value::from(s),
                SignalValue::Number(n) => serde_json::Value::from(n),
            };
            (key.to_string(), value)
        })
        .collect::<serde_json::Map<_, _>>();

    println!(
        "{}",
        serde_json::to_string_pretty(&entries)?
            .to_colored_json_with_styler(ColorMode::Auto(Output::StdOut), json_color_styler())?
    );

    Ok(())
}

fn json_color_styler() -> Styler {
    Styler {
        key: Color::Green.foreground(),
        string_value: Color::Blue.bold(),
        integer_value: Color::Magenta.bold(),
        object_brackets: Color::Yellow.bold(),
        ..Default::default()
    }
}
