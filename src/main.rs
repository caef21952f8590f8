//! Murmur - a terminal client for a self-hosted posts feed
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, bail};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use murmur::api::HttpClient;
use murmur::composer::Composer;
use murmur::feed::{FeedList, Notice};
use murmur::models::{LocalFile, MediaSlot};

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    match parse_args()? {
        Command::Run => murmur::app::run(),
        Command::List { limit } => block_on(list_cli(limit)),
        Command::Post {
            content,
            image,
            video,
        } => block_on(post_cli(content, image, video)),
        Command::Like { id } => block_on(like_cli(id)),
        Command::Delete { id } => block_on(delete_cli(id)),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Run,
    List {
        limit: usize,
    },
    Post {
        content: String,
        image: Option<String>,
        video: Option<String>,
    },
    Like {
        id: i64,
    },
    Delete {
        id: i64,
    },
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Run);
    }

    let flag = |names: &[&str]| {
        args.iter()
            .position(|a| names.contains(&a.as_str()))
            .and_then(|i| args.get(i + 1))
            .cloned()
    };

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "list" | "ls" => {
            let limit = match flag(&["--limit", "-l"]) {
                Some(n) => n.parse().with_context(|| format!("Invalid limit: {n}"))?,
                None => 20,
            };
            Ok(Command::List { limit })
        }

        "post" => {
            let content = args
                .get(2)
                .filter(|a| !a.starts_with("--"))
                .cloned()
                .unwrap_or_default();
            Ok(Command::Post {
                content,
                image: flag(&["--image", "-i"]),
                video: flag(&["--video", "-V"]),
            })
        }

        "like" => Ok(Command::Like { id: parse_id(&args)? }),
        "delete" | "rm" => Ok(Command::Delete { id: parse_id(&args)? }),

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'murmur --help' for usage"
        )),
    }
}

fn parse_id(args: &[String]) -> Result<i64> {
    let raw = args
        .get(2)
        .ok_or_else(|| anyhow::anyhow!("Missing post id"))?;
    raw.parse().with_context(|| format!("Invalid post id: {raw}"))
}

fn print_help() {
    let config_path = murmur::Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"{}
🗨 Murmur - a terminal client for your posts feed

USAGE:
    murmur                             Launch TUI
    murmur [COMMAND]

COMMANDS:
    list [OPTIONS]                     Print the feed
      Options:
        -l, --limit <n>                Number of posts (default: 20)

    post <text> [OPTIONS]              Create a post
      Options:
        -i, --image <path|url>         Attach an image file or link one
        -V, --video <path|url>         Attach a video file or link one
      Examples:
        murmur post "Hello world!"
        murmur post "Look" --image ~/Pictures/cat.png
        murmur post "" --video https://youtu.be/dQw4w9WgXcQ

    like <id>                          Like a post
    delete <id>                        Delete a post

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

KEYBINDINGS (TUI):
    j/k, g/G      Move / jump
    n             New post
    e             Edit post
    d             Delete post
    l             Like post
    r             Reload
    o / v         Open image / video in browser
    t             Change theme
    ?             Help

CONFIG:
    {}
"#,
        murmur::LOGO,
        config_path
    );
}

fn print_version() {
    println!("murmur {}", murmur::VERSION);
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    tokio::runtime::Runtime::new()
        .context("Failed to start async runtime")?
        .block_on(future)
}

fn client() -> Result<(murmur::Config, HttpClient)> {
    let config = murmur::Config::load()?;
    let client = HttpClient::from_config(&config).context("Failed to create HTTP client")?;
    Ok((config, client))
}

/// Fail the command on an error notice
fn check(notice: Notice) -> Result<String> {
    match notice {
        Notice::Info(message) => Ok(message),
        Notice::Error(message) => bail!(message),
    }
}

async fn list_cli(limit: usize) -> Result<()> {
    let (config, client) = client()?;
    let mut feed = FeedList::new();
    check(feed.load(&client).await)?;

    if feed.is_empty() {
        println!("No posts yet. Be the first to post something!");
        return Ok(());
    }

    println!("🗨 {}", client.posts_url());
    println!("{}", "─".repeat(60));

    for post in feed.posts().iter().take(limit) {
        println!("\n#{} · {}", post.id, post.relative_time());
        if !post.content.is_empty() {
            println!("{}", textwrap::fill(&post.content, 72));
        }
        if let Some(image) = post.image() {
            println!(
                "🖼  {}",
                murmur::models::resolve_media_url(image, &config.media_base_url)
            );
        }
        if let Some(video) = post.video() {
            let link = murmur::models::VideoLink::classify(video, &config.media_base_url);
            println!("🎬 {}: {}", link.label(), link.url());
        }
        println!("♥ {}", post.likes);
    }

    Ok(())
}

async fn post_cli(content: String, image: Option<String>, video: Option<String>) -> Result<()> {
    let mut composer = Composer::new();
    composer.open(None);
    composer.set_text(content);

    for (slot, value) in [(MediaSlot::Image, image), (MediaSlot::Video, video)] {
        let Some(value) = value else { continue };
        if value.starts_with("http://") || value.starts_with("https://") {
            composer.set_url(slot, value);
        } else {
            let file = LocalFile::open(&value)
                .with_context(|| format!("Cannot attach {} file", slot.label().to_lowercase()))?;
            composer.select_file(slot, file);
        }
    }

    let submission = composer.submit()?;
    let (_, client) = client()?;
    let mut feed = FeedList::new();
    let message = check(feed.create(&client, &submission.payload).await)?;
    composer.finish(submission.ticket, true);

    match feed.posts().first() {
        Some(post) => println!("✓ {message} (#{})", post.id),
        None => println!("✓ {message}"),
    }
    Ok(())
}

async fn like_cli(id: i64) -> Result<()> {
    let (_, client) = client()?;
    let mut feed = FeedList::new();
    let message = check(feed.like(&client, id).await)?;
    println!("♥ {message}");
    Ok(())
}

async fn delete_cli(id: i64) -> Result<()> {
    let (_, client) = client()?;
    let mut feed = FeedList::new();
    let message = check(feed.remove(&client, id).await)?;
    println!("✓ {message}");
    Ok(())
}
