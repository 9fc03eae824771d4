use super::{describe_fetch_error, Context};
use ghfeed_core::{EventRecord, SortOrder};
use ghfeed_session::Feed;

const RULE: &str = "============================================================";

pub fn run(ctx: &Context, user: &str, sort: SortOrder, limit: Option<usize>) -> anyhow::Result<()> {
    let session = ctx.session(user)?.with_sort_order(sort);
    let feed = session
        .events()
        .map_err(|e| anyhow::anyhow!(describe_fetch_error(session.key(), &e)))?;

    match feed {
        Feed::NoActivity => println!("No activity for this user"),
        Feed::Events(records) => {
            let limit = limit.unwrap_or(ctx.config.display_limit);
            println!("{}", render_events(session.key(), &records, limit));
        }
    }
    Ok(())
}

fn render_events(user: &str, records: &[EventRecord], limit: usize) -> String {
    let mut lines = vec![
        RULE.to_string(),
        format!("Activity of the following user : {}", user),
        RULE.to_string(),
    ];

    for (i, record) in records.iter().take(limit).enumerate() {
        lines.push(format!(
            "{}. {} - {}",
            i + 1,
            record.format(),
            record.format_date()
        ));
    }

    if records.len() > limit {
        lines.push(String::new());
        lines.push(format!("... and {} more events", records.len() - limit));
    }

    lines.join("\n")
}
