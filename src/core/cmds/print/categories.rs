use std::path::Path;

use console::style;
use log::info;
use serde::Serialize;

use crate::types::config::Config;
use crate::types::{AppResult, Category};

#[derive(Debug, Serialize)]
pub struct CategoryInfo {
    pub name: String,
    pub pattern: String,
    pub files: usize,
}

#[derive(Serialize)]
struct JsonCategories {
    categories: Vec<CategoryInfo>,
}

/// Number of files a category pattern currently selects.
///
/// A directory pattern counts every file below it; anything else is
/// treated as a glob.
pub fn matching_files(pattern: &str) -> usize {
    let path = Path::new(pattern);
    let glob_pattern = if path.is_dir() {
        format!("{}/**/*", pattern.trim_end_matches('/'))
    } else {
        pattern.to_string()
    };
    match glob::glob(&glob_pattern) {
        Ok(paths) => paths.filter_map(Result::ok).filter(|p| p.is_file()).count(),
        Err(_) => 0,
    }
}

pub fn describe(categories: &[Category]) -> Vec<CategoryInfo> {
    categories
        .iter()
        .map(|c| CategoryInfo {
            name: c.name.clone(),
            pattern: c.pattern.clone(),
            files: matching_files(&c.pattern),
        })
        .collect()
}

pub fn execute(cfg: &Config, format: &str) -> AppResult<()> {
    let registry = cfg.registry()?;
    let entries: Vec<Category> = registry.iter().cloned().collect();
    let infos = describe(&entries);

    if format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonCategories { categories: infos })?
        );
        return Ok(());
    }

    if infos.is_empty() {
        info!("No categories configured");
        return Ok(());
    }

    let width = infos.iter().map(|i| i.name.len()).max().unwrap_or(0);
    for item in infos {
        let files = if item.files == 0 {
            style("no files".to_string()).yellow()
        } else {
            style(format!("{} files", item.files)).green()
        };
        info!(
            "  {:<width$}  {}  ({})",
            item.name,
            item.pattern,
            files,
            width = width
        );
    }

    Ok(())
}
