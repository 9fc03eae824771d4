use super::{validate_user, Context};

pub fn run_clear(ctx: &Context, user: &str) -> anyhow::Result<()> {
    let user = validate_user(user)?;
    ctx.store().invalidate(user)?;
    println!("Cleared cached activity for {}", user);
    Ok(())
}

pub fn run_path(ctx: &Context) -> anyhow::Result<()> {
    println!("{}", ctx.paths.cache_dir.display());
    Ok(())
}
