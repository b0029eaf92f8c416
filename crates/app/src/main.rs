mod logger;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use lms_core::model::{ContentKind, CourseId, Lesson, LessonContent, LessonId, LessonRef};
use lms_core::scorm::LearnerInfo;
use services::{Clock, CompletionCallback, HeartbeatConfig, PlayerServices};
use transport::HttpProgressConfig;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingLesson { what: &'static str },
    InvalidHeartbeat { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingLesson { what } => write!(f, "no {what} given"),
            ArgsError::InvalidHeartbeat { raw } => {
                write!(f, "invalid --heartbeat-secs value: {raw}")
            }
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

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

struct DesktopApp {
    lesson: Lesson,
    player_services: Arc<PlayerServices>,
}

impl UiApp for DesktopApp {
    fn lesson(&self) -> Lesson {
        self.lesson.clone()
    }

    fn player_services(&self) -> Arc<PlayerServices> {
        Arc::clone(&self.player_services)
    }

    fn on_lesson_complete(&self) -> Option<CompletionCallback> {
        Some(Arc::new(|lesson: &LessonRef| {
            tracing::info!(%lesson, "lesson completed");
        }))
    }
}

struct Args {
    transport: HttpProgressConfig,
    course_id: Option<String>,
    lesson_id: Option<String>,
    title: String,
    kind: Option<String>,
    payload: Option<String>,
    learner: Option<LearnerInfo>,
    heartbeat_secs: Option<u64>,
    verbose: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- --course-id <id> --lesson-id <id> --kind <kind> (--url <url> | --text <markdown>)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --kind video|scorm|pdf|ppt|text");
    eprintln!("  --title <text>            lesson title shown in the header");
    eprintln!("  --api-base <url>          default http://localhost:8080/api");
    eprintln!("  --token <bearer>");
    eprintln!("  --learner-id <id> --learner-name <name>");
    eprintln!("  --heartbeat-secs <secs>   default 30");
    eprintln!("  --verbose");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LMS_API_BASE, LMS_API_TOKEN, LMS_API_TIMEOUT_SECS, LMS_COURSE_ID, LMS_LESSON_ID,");
    eprintln!("  LMS_LESSON_TITLE, LMS_LEARNER_ID, LMS_LEARNER_NAME, LMS_HEARTBEAT_SECS, LMS_LOG");
}

fn parse_heartbeat(raw: String) -> Result<u64, ArgsError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ArgsError::InvalidHeartbeat { raw }),
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut transport = HttpProgressConfig::from_env();
        let mut course_id = env_value("LMS_COURSE_ID");
        let mut lesson_id = env_value("LMS_LESSON_ID");
        let mut title = env_value("LMS_LESSON_TITLE").unwrap_or_else(|| "Lesson".into());
        let mut kind = None;
        let mut payload = None;
        let mut learner_id = env_value("LMS_LEARNER_ID");
        let mut learner_name = env_value("LMS_LEARNER_NAME");
        let mut heartbeat_secs = env_value("LMS_HEARTBEAT_SECS").map(parse_heartbeat).transpose()?;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-base" => transport.api_base = require_value(args, "--api-base")?,
                "--token" => transport.token = Some(require_value(args, "--token")?),
                "--course-id" => course_id = Some(require_value(args, "--course-id")?),
                "--lesson-id" => lesson_id = Some(require_value(args, "--lesson-id")?),
                "--title" => title = require_value(args, "--title")?,
                "--kind" => kind = Some(require_value(args, "--kind")?),
                "--url" => payload = Some(require_value(args, "--url")?),
                "--text" => payload = Some(require_value(args, "--text")?),
                "--learner-id" => learner_id = Some(require_value(args, "--learner-id")?),
                "--learner-name" => learner_name = Some(require_value(args, "--learner-name")?),
                "--heartbeat-secs" => {
                    heartbeat_secs = Some(parse_heartbeat(require_value(args, "--heartbeat-secs")?)?);
                }
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let learner = learner_id.map(|id| LearnerInfo {
            id,
            name: learner_name.unwrap_or_default(),
        });

        Ok(Self {
            transport,
            course_id,
            lesson_id,
            title,
            kind,
            payload,
            learner,
            heartbeat_secs,
            verbose,
        })
    }

    fn lesson(&self) -> Result<Lesson, Box<dyn std::error::Error>> {
        let course_id = self
            .course_id
            .as_deref()
            .ok_or(ArgsError::MissingLesson { what: "--course-id" })?;
        let lesson_id = self
            .lesson_id
            .as_deref()
            .ok_or(ArgsError::MissingLesson { what: "--lesson-id" })?;
        let kind = self
            .kind
            .as_deref()
            .ok_or(ArgsError::MissingLesson { what: "--kind" })?;
        let payload = self
            .payload
            .as_deref()
            .ok_or(ArgsError::MissingLesson { what: "--url or --text" })?;

        let reference = LessonRef::new(
            CourseId::new(course_id).map_err(lms_core::Error::from)?,
            LessonId::new(lesson_id).map_err(lms_core::Error::from)?,
        );
        let kind = ContentKind::parse(kind).map_err(lms_core::Error::from)?;
        let content = LessonContent::from_parts(kind, payload).map_err(lms_core::Error::from)?;

        Ok(Lesson {
            reference,
            title: self.title.clone(),
            content,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    logger::init_logging(parsed.verbose);

    let lesson = parsed.lesson()?;
    tracing::info!(lesson = %lesson.reference, kind = ?lesson.content.kind(), "opening lesson");

    let mut services = PlayerServices::http(Clock::system(), &parsed.transport)?;
    if let Some(secs) = parsed.heartbeat_secs {
        services = services.with_heartbeat(HeartbeatConfig::every(Duration::from_secs(secs)));
    }
    if let Some(learner) = parsed.learner.clone() {
        services = services.with_learner(learner);
    }

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        lesson: lesson.clone(),
        player_services: Arc::new(services),
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    // Explicitly disable it so the app doesn't behave like a modal window.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title(lesson.title.clone())
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_owned());
        Args::parse(&mut iter)
    }

    #[test]
    fn builds_a_video_lesson_from_flags() {
        let args = parse(&[
            "--course-id",
            "ethics",
            "--lesson-id",
            "l1",
            "--kind",
            "video",
            "--url",
            "https://vimeo.com/76979871",
            "--title",
            "Anti-bribery",
        ])
        .unwrap();
        let lesson = args.lesson().unwrap();
        assert_eq!(lesson.reference.to_string(), "ethics/l1");
        assert_eq!(lesson.title, "Anti-bribery");
        assert_eq!(lesson.content.kind(), ContentKind::Video);
    }

    #[test]
    fn rejects_unknown_flags_and_missing_values() {
        assert!(matches!(parse(&["--bogus"]), Err(ArgsError::UnknownArg(_))));
        assert!(matches!(
            parse(&["--kind"]),
            Err(ArgsError::MissingValue { flag: "--kind" })
        ));
        assert!(matches!(
            parse(&["--heartbeat-secs", "0"]),
            Err(ArgsError::InvalidHeartbeat { .. })
        ));
    }

    #[test]
    fn unknown_kind_is_a_lesson_error() {
        let args = parse(&[
            "--course-id",
            "c",
            "--lesson-id",
            "l",
            "--kind",
            "quiz",
            "--url",
            "https://cdn.example.com/q",
        ])
        .unwrap();
        let err = args.lesson().unwrap_err();
        assert!(err.to_string().contains("quiz"), "{err}");
    }

    #[test]
    fn token_flag_overrides_env() {
        let args = parse(&["--token", "secret", "--api-base", "https://lms.example.com/api"]).unwrap();
        assert_eq!(args.transport.token.as_deref(), Some("secret"));
        assert_eq!(args.transport.api_base, "https://lms.example.com/api");
    }
}
