use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pizza_assistant::api::ApiServer;
use pizza_assistant::dialogue::greeting;
use pizza_assistant::voice::{
    AudioCapture, AudioPlayback, ConsoleInput, ConsoleOutput, MicrophoneInput,
    PLAYBACK_SAMPLE_RATE, SpeakerOutput, SpeechInput, SpeechOutput, TextToSpeech, store_artifact,
};
use pizza_assistant::{Assistant, ChatCompletionClient, Config, HttpOrderGateway, vendor};

/// Pizza - Voice assistant that chats and orders pizza
#[derive(Parser)]
#[command(name = "pizza", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Read utterances from stdin instead of the microphone
    #[arg(long, env = "PIZZA_TEXT_INPUT")]
    text: bool,

    /// Print replies instead of speaking them
    #[arg(long, env = "PIZZA_MUTE")]
    mute: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
#[allow(clippy::enum_variant_names)]
enum Command {
    /// Run the ordering microservice
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,pizza_assistant=info",
        1 => "info,pizza_assistant=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Serve { port } => serve(port).await,
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker(),
            Command::TestTts { text } => test_tts(&text).await,
        };
    }

    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    let input: Box<dyn SpeechInput> = if cli.text {
        Box::new(ConsoleInput::stdin(&config.dialogue.quit_keyword))
    } else {
        Box::new(MicrophoneInput::from_config(&config)?)
    };
    let output: Box<dyn SpeechOutput> = if cli.mute {
        Box::new(ConsoleOutput)
    } else {
        Box::new(SpeakerOutput::from_config(&config)?)
    };

    let conversation = Arc::new(ChatCompletionClient::from_config(&config)?);
    let gateway = Arc::new(HttpOrderGateway::from_config(&config)?);

    tracing::info!(
        text_input = cli.text,
        muted = cli.mute,
        gateway = %config.order.gateway_url,
        "starting pizza assistant"
    );

    let mut assistant = Assistant::new(input, output, conversation, gateway)
        .with_dialogue_config(&config.dialogue)
        .with_greeting(greeting(&config.dialogue));

    let stats = assistant.run().await;
    tracing::debug!(?stats, "session stats");

    Ok(())
}

/// Run the ordering microservice until Ctrl-C
async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let port = port.unwrap_or(config.server.port);
    let vendor = vendor::from_config(&config)?;

    tracing::info!(port, vendor = vendor.name(), "starting ordering service");
    ApiServer::new(vendor, port).run().await?;

    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;
    println!("---");

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let (energy, peak) = capture.level();

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );

        capture.clear();
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");

    Ok(())
}

/// Test speaker output with a sine wave
fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new()?;

    let frequency = 440.0_f32;
    let num_samples = PLAYBACK_SAMPLE_RATE as usize * 2;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / PLAYBACK_SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3 // 30% volume
        })
        .collect();

    println!("Playing {} samples at {PLAYBACK_SAMPLE_RATE} Hz...", samples.len());
    playback.play(samples)?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");
    println!("If you didn't hear anything, check:");
    println!("  1. Run: pactl info | grep 'Default Sink'");
    println!("  2. Run: pactl list sinks short");

    Ok(())
}

/// Test TTS output
async fn test_tts(text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load()?;
    let tts = TextToSpeech::from_config(&config)?;

    println!("Synthesizing speech...");
    let mp3_data = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    store_artifact(&config.voice.artifact_path, &mp3_data)?;
    println!("Saved to {}", config.voice.artifact_path.display());

    println!("Playing audio...");
    AudioPlayback::new()?.play_mp3(&mp3_data)?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}
