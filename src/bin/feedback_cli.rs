// Command-line front end for submitting reviews and watching the admin dashboard.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tokio::sync::Mutex;

use feedbackloop::client::dashboard::{spawn_refresh_loop, Sentiment, REFRESH_INTERVAL};
use feedbackloop::client::{Dashboard, RatingFilter, ReviewsApi, SubmissionForm, SubmitStatus};

/// FeedbackLoop client
#[derive(Parser, Debug)]
#[command(name = "feedback-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Submit star-rated feedback and inspect stored reviews", long_about = None)]
struct Cli {
    /// Base URL of the feedback server
    #[arg(
        global = true,
        long = "api-url",
        env = "FEEDBACK_API_URL",
        default_value = "http://localhost:5000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a review and print the reply
    Submit {
        /// Star rating from 1 to 5
        #[arg(long, short = 'r', default_value_t = 0)]
        rating: u8,

        /// Review text (capped at 1500 characters)
        #[arg(long, short = 't', default_value = "")]
        text: String,
    },

    /// Print metrics and the review list
    Dashboard {
        /// Show only reviews with this exact rating
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=5))]
        rating: Option<i32>,

        /// Oldest reviews first
        #[arg(long)]
        oldest: bool,

        /// Expand the row with this id (repeatable)
        #[arg(long = "expand", value_name = "ID")]
        expand: Vec<String>,

        /// Keep refreshing every 15 seconds
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let api = match ReviewsApi::new(cli.api_url.clone()) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Submit { rating, text } => {
            let mut form = SubmissionForm::new();
            form.set_rating(rating);
            form.set_text(&text);

            match form.submit(&api).await {
                SubmitStatus::Success => {
                    println!("{}", form.response().unwrap_or_default());
                }
                _ => {
                    eprintln!("{}", form.error().unwrap_or("Submission failed."));
                    std::process::exit(1);
                }
            }
        }
        Commands::Dashboard {
            rating,
            oldest,
            expand,
            watch,
        } => {
            let mut dashboard = Dashboard::new();
            if let Some(k) = rating {
                dashboard.set_filter(RatingFilter::Exactly(k));
            }
            if oldest {
                dashboard.toggle_sort();
            }
            for id in &expand {
                dashboard.toggle_expanded(id);
            }

            if !watch {
                dashboard.refresh(&api).await;
                print_dashboard(&dashboard);
                if dashboard.error().is_some() {
                    std::process::exit(1);
                }
                return;
            }

            let shared = Arc::new(Mutex::new(dashboard));
            let handle = spawn_refresh_loop(api, shared.clone(), REFRESH_INTERVAL);
            let mut last_printed = None;

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = tokio::time::sleep(std::time::Duration::from_millis(500)) => {
                        let dashboard = shared.lock().await;
                        let stamp = (dashboard.last_refreshed(), dashboard.error().map(String::from));
                        if dashboard.is_loading() || last_printed.as_ref() == Some(&stamp) {
                            continue;
                        }
                        print_dashboard(&dashboard);
                        last_printed = Some(stamp);
                    }
                }
            }
            handle.abort();
        }
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    if let Some(err) = dashboard.error() {
        println!("! {}", err);
    }

    let metrics = dashboard.metrics();
    println!(
        "Total reviews: {}   Average rating: {}",
        metrics.total,
        metrics.average_label()
    );
    for row in metrics.breakdown() {
        println!("  {} stars: {:>4} ({:.1}%)", row.stars, row.count, row.percentage);
    }
    if let Some(at) = dashboard.last_refreshed() {
        println!("Last refreshed: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!();

    let rows = dashboard.visible();
    if rows.is_empty() {
        println!("No reviews found matching filters.");
        return;
    }

    for review in rows {
        let marker = match Sentiment::of(review.rating) {
            Sentiment::Positive => '+',
            Sentiment::Neutral => '~',
            Sentiment::Negative => '-',
        };
        match dashboard.details(review) {
            None => {
                let preview: String = review.text.chars().take(60).collect();
                println!(
                    "{} {}.0  {}  {}  [{}]",
                    marker,
                    review.rating,
                    review.created_at.format("%b %d %H:%M"),
                    preview,
                    review.id
                );
            }
            Some(details) => {
                println!(
                    "{} {}.0  {}  [{}]",
                    marker,
                    review.rating,
                    review.created_at.format("%b %d %H:%M"),
                    review.id
                );
                println!("    Full review: {}", details.full_text);
                if let Some(reply) = details.ai_response {
                    println!("    AI response sent to user: \"{}\"", reply);
                }
                if let Some(summary) = details.ai_summary {
                    println!("    Summary: {}", summary);
                }
                if let Some(action) = details.ai_action {
                    println!("    Recommended action: {}", action);
                }
            }
        }
    }
}
