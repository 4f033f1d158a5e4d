//! Delete command - remove a stored question and its image copy.

use super::AppContext;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing::warn;

pub fn run(ctx: &AppContext, id: &str) -> Result<()> {
    let db = ctx.database()?;

    let question = db.get_question_by_prefix(id)?;
    let deleted = db.delete_question(&question.id)?;

    let image = Path::new(&deleted.image_url);
    if image.exists() {
        if let Err(e) = std::fs::remove_file(image) {
            warn!("Could not remove stored image {}: {}", image.display(), e);
        }
    }

    println!(
        "{} Deleted question {} from {}",
        "✓".green(),
        deleted.id[..8].to_string().cyan(),
        deleted.exam_code
    );

    Ok(())
}
