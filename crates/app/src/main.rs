use std::fmt;
use std::io::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use backend::{FakeLessonApi, HttpLessonApi, LessonApi};
use services::render::{
    ChoiceHighlight, Direction, ImageRef, NavState, PracticeView, QuestionVm, WalkthroughView,
};
use services::transition::SETTLE_DURATION;
use services::tween::PROGRESS_TICK;
use services::typewriter::TYPE_TICK;
use services::walkthrough::PRACTICE_PATH;
use services::{Clock, PracticeController, WalkthroughController};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidServerUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidServerUrl { raw } => write!(f, "invalid --server value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- examples [--server <url>] [--offline]");
    eprintln!("  cargo run -p app -- practice [--server <url>] [--offline]");
    eprintln!("  cargo run -p app -- reset    [--server <url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --server http://127.0.0.1:5000  (or LESSON_SERVER_URL)");
    eprintln!("  --offline runs against built-in lesson content, no server");
    eprintln!();
    eprintln!("Walkthrough keys: n(ext), p(rev), q(uit).");
    eprintln!("Practice keys: a-d select, s(ubmit), c(ontinue), q(uit).");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Examples,
    Practice,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "examples" => Some(Self::Examples),
            "practice" => Some(Self::Practice),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

struct Args {
    server: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut server = std::env::var("LESSON_SERVER_URL")
            .ok()
            .or_else(|| Some("http://127.0.0.1:5000".to_string()));

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--server" => {
                    let value = require_value(args, "--server")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidServerUrl { raw: value });
                    }
                    server = Some(value);
                }
                "--offline" => server = None,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { server })
    }
}

/// Console rendering of the walkthrough page.
///
/// Image loads are recorded rather than performed; the event loop acks
/// them back to the controller, standing in for the browser's loader.
#[derive(Default)]
struct ConsoleWalkthroughView {
    pending_image: Option<ImageRef>,
    redirect: Option<String>,
}

impl WalkthroughView for ConsoleWalkthroughView {
    fn set_question(&mut self, text: &str) {
        println!("\n=== {text} ===");
    }

    fn start_image_load(&mut self, image: ImageRef) {
        self.pending_image = Some(image);
    }

    fn place_image(&mut self, image: ImageRef) {
        println!("  [whiteboard: {}]", image.path);
    }

    fn begin_slide(&mut self, image: ImageRef, direction: Direction) {
        let arrow = match direction {
            Direction::Forward => "^",
            Direction::Backward => "v",
        };
        println!("  [whiteboard {arrow}: {}]", image.path);
    }

    fn show_image_fallback(&mut self, display_text: &str, annotation: &str) {
        println!("  {display_text}");
        println!("  ({annotation})");
    }

    fn clear_narration(&mut self) {}

    fn append_narration(&mut self, ch: char) {
        print!("{ch}");
        let _ = std::io::stdout().flush();
    }

    fn set_progress(&mut self, percent: f64) {
        println!("  progress: {}%", percent.round());
    }

    fn set_nav(&mut self, nav: NavState) {
        let prev = if nav.prev_enabled { "p=prev " } else { "" };
        println!("  [{prev}n={}]", nav.next_label);
    }

    fn announce(&mut self, message: &str) {
        println!("  -- {message}");
    }

    fn show_banner(&mut self, message: &str) {
        eprintln!("! {message}");
    }

    fn navigate(&mut self, path: &str) {
        self.redirect = Some(path.to_string());
    }
}

/// Console rendering of the practice page.
#[derive(Default)]
struct ConsolePracticeView {
    redirect: Option<String>,
    complete: bool,
}

impl PracticeView for ConsolePracticeView {
    fn show_question(&mut self, question: &QuestionVm) {
        println!("\n=== {} ===", question.question_text);
        for choice in &question.choices {
            println!("  {}) {}", choice.letter, choice.text);
        }
    }

    fn set_selected(&mut self, letter: &str) {
        println!("  selected: {letter}");
    }

    fn highlight_choice(&mut self, letter: &str, highlight: ChoiceHighlight) {
        let marker = match highlight {
            ChoiceHighlight::Correct => "correct",
            ChoiceHighlight::Incorrect => "wrong",
            ChoiceHighlight::Reveal => "the answer",
        };
        println!("  {letter}) <- {marker}");
    }

    fn set_submit_enabled(&mut self, _enabled: bool) {}

    fn set_submit_label(&mut self, _label: &str) {}

    fn set_continue_enabled(&mut self, enabled: bool) {
        if enabled {
            println!("  [c=continue]");
        }
    }

    fn show_feedback(&mut self, text: &str, _is_correct: bool) {
        println!("  {text}");
    }

    fn set_progress(&mut self, percent: f64) {
        print!("\r  progress: {}%  ", percent.round());
        let _ = std::io::stdout().flush();
    }

    fn set_stats(&mut self, attempted: u32, correct: u32) {
        println!("  score: {correct}/{attempted}");
    }

    fn show_complete(&mut self, message: &str) {
        println!("\n*** {message} ***");
        self.complete = true;
    }

    fn announce(&mut self, message: &str) {
        println!("  -- {message}");
    }

    fn show_banner(&mut self, message: &str) {
        eprintln!("! {message}");
    }

    fn navigate(&mut self, path: &str) {
        self.redirect = Some(path.to_string());
    }
}

/// Play out the animations the browser would run: ack the pending image
/// load, let the slide settle, then type the narration out.
async fn pump_walkthrough(controller: &mut WalkthroughController<ConsoleWalkthroughView>) {
    while let Some(image) = controller.view_mut().pending_image.take() {
        controller.on_image_loaded(image.generation, true);
        if controller.is_transitioning() {
            tokio::time::sleep(SETTLE_DURATION).await;
            controller.on_settle_complete(image.generation);
        }
    }
    let mut ticker = tokio::time::interval(TYPE_TICK);
    while controller.narration_active() {
        ticker.tick().await;
        controller.narration_tick();
    }
    println!();
}

async fn drain_progress(controller: &mut PracticeController<ConsolePracticeView>) {
    let mut ticker = tokio::time::interval(PROGRESS_TICK);
    while controller.progress_animating() {
        ticker.tick().await;
        controller.progress_tick();
    }
    println!();
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    print!("> ");
    let _ = std::io::stdout().flush();
    lines
        .next_line()
        .await
        .ok()
        .flatten()
        .map(|line| line.trim().to_ascii_lowercase())
}

async fn run_examples(
    api: Arc<dyn LessonApi>,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let mut controller = WalkthroughController::new(api, ConsoleWalkthroughView::default());
    controller.start().await?;
    pump_walkthrough(&mut controller).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = prompt(&mut lines).await {
        let outcome = match line.as_str() {
            "n" | "next" | "" => controller.next_step().await,
            "p" | "prev" => controller.prev_step().await,
            "q" | "quit" => return Ok(None),
            other => {
                println!("? {other} (n, p, q)");
                Ok(())
            }
        };
        if let Err(err) = outcome {
            eprintln!("! {err}");
        }
        pump_walkthrough(&mut controller).await;
        if let Some(destination) = controller.view_mut().redirect.take() {
            return Ok(Some(destination));
        }
    }
    Ok(None)
}

async fn run_practice(api: Arc<dyn LessonApi>) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = PracticeController::new(
        api,
        ConsolePracticeView::default(),
        Clock::default_clock(),
        PRACTICE_PATH,
    );
    if let Err(err) = controller.start().await {
        eprintln!("! {err}");
    }
    drain_progress(&mut controller).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = prompt(&mut lines).await {
        let outcome = match line.as_str() {
            "a" | "b" | "c" | "d" => {
                controller.select_choice(&line);
                Ok(())
            }
            "s" | "submit" => controller.submit_answer().await,
            "c" | "continue" | "" => controller.next_question().await,
            "q" | "quit" => return Ok(()),
            other => {
                println!("? {other} (a-d, s, c, q)");
                Ok(())
            }
        };
        if let Err(err) = outcome {
            eprintln!("! {err}");
        }
        drain_progress(&mut controller).await;
        let view = controller.view_mut();
        if view.complete {
            return Ok(());
        }
        if let Some(destination) = view.redirect.take() {
            println!("-> {destination}");
            return Ok(());
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Examples,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Examples,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let api: Arc<dyn LessonApi> = match &parsed.server {
        Some(url) => Arc::new(HttpLessonApi::new(url)?),
        None => Arc::new(FakeLessonApi::new()),
    };

    match cmd {
        Command::Examples => {
            let redirect = run_examples(Arc::clone(&api)).await?;
            if redirect.as_deref() == Some(PRACTICE_PATH) {
                println!("-> {PRACTICE_PATH}");
                run_practice(api).await
            } else {
                Ok(())
            }
        }
        Command::Practice => run_practice(api).await,
        Command::Reset => {
            let response = api.reset().await?;
            println!("-> {}", response.redirect.as_deref().unwrap_or("/"));
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
