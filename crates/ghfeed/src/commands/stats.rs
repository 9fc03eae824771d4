use super::{describe_fetch_error, Context};
use ghfeed_core::CategoryCounts;

const BAR_WIDTH: u64 = 30;

pub fn run(ctx: &Context, user: &str, days: Option<u32>) -> anyhow::Result<()> {
    let session = ctx.session(user)?;
    let days = days.unwrap_or(ctx.config.stats_window_days);
    let counts = session
        .stats(days)
        .map_err(|e| anyhow::anyhow!(describe_fetch_error(session.key(), &e)))?;

    println!("{}", render_stats(session.key(), days, counts.as_ref()));
    Ok(())
}

fn render_stats(user: &str, days: u32, counts: Option<&CategoryCounts>) -> String {
    let Some(counts) = counts else {
        return format!(
            "No activity for {} in the last {} days, stats unavailable",
            user, days
        );
    };

    let max = counts.max_count().max(1);
    let label_width = counts
        .iter()
        .map(|(c, _)| c.label().len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!("Activity of {} over the last {} days", user, days)];
    for (category, count) in counts.iter() {
        let filled = bar_len(count, max);
        lines.push(format!(
            "  {:<width$}  {} {}",
            category.label(),
            "#".repeat(filled),
            count,
            width = label_width
        ));
    }
    lines.join("\n")
}

/// Bar length scaled so `max` fills `BAR_WIDTH`
fn bar_len(count: u64, max: u64) -> usize {
    let scaled = (u128::from(count) * u128::from(BAR_WIDTH)).div_ceil(u128::from(max.max(1)));
    scaled.min(u128::from(BAR_WIDTH)) as usize
}
