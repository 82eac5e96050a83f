// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindweave CLI entrypoint.
//!
//! Opens an existing project (`--project`), or drafts a new one in a short terminal dialogue,
//! then runs the map view. `--demo` uses the built-in in-memory project service instead of the
//! HTTP backend.

use std::env;
use std::error::Error;
use std::path::Path;
use std::rc::Rc;
use std::sync::Mutex;

use mindweave::draft::{load_document, run_drafting};
use mindweave::model::ProjectId;
use mindweave::sync::{
    DraftMode, HttpProjectService, InMemoryProjectService, ProjectService, DEFAULT_API_BASE,
    DEFAULT_TIMEOUT,
};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

const API_BASE_ENV: &str = "MINDWEAVE_API_BASE";
const LOG_ENV: &str = "MINDWEAVE_LOG";
const LOG_FILTER_ENV: &str = "MINDWEAVE_LOG_FILTER";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--api-base <url>] --project <id>\n  {program} [--api-base <url>] [--mode brief|detail|deep] [--idea <text>] [--document <path>]\n  {program} --demo [--mode brief|detail|deep] [--idea <text>] [--document <path>]\n\nWithout --project a new project is drafted first; --idea (and the text of --document) seed\nthe first message, otherwise it is read from the terminal.\n--api-base defaults to ${API_BASE_ENV} or {DEFAULT_API_BASE}.\n--demo uses a built-in in-memory service and opens its sample project unless drafting flags are given.\n\nSet {LOG_ENV}=<file> to write logs ({LOG_FILTER_ENV} sets the filter, default info)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    demo: bool,
    api_base: Option<String>,
    project: Option<String>,
    idea: Option<String>,
    document: Option<String>,
    mode: Option<DraftMode>,
}

impl CliOptions {
    fn wants_draft(&self) -> bool {
        self.idea.is_some() || self.document.is_some() || self.mode.is_some()
    }
}

fn set_once(slot: &mut Option<String>, value: Option<String>) -> Result<(), ()> {
    if slot.is_some() {
        return Err(());
    }
    *slot = Some(value.ok_or(())?);
    Ok(())
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--api-base" => set_once(&mut options.api_base, args.next())?,
            "--project" => set_once(&mut options.project, args.next())?,
            "--idea" => set_once(&mut options.idea, args.next())?,
            "--document" => set_once(&mut options.document, args.next())?,
            "--mode" => {
                if options.mode.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                options.mode = Some(raw.parse().map_err(|_| ())?);
            }
            _ => return Err(()),
        }
    }

    if options.demo && options.api_base.is_some() {
        return Err(());
    }
    if options.project.is_some() && options.wants_draft() {
        return Err(());
    }
    if options.demo && options.project.is_some() {
        return Err(());
    }

    Ok(options)
}

/// Logs go to a file: the terminal belongs to the map view.
fn init_logging() -> Result<(), Box<dyn Error>> {
    let Some(path) = env::var_os(LOG_ENV) else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| err.to_string())?;
    Ok(())
}

fn api_base(options: &CliOptions) -> String {
    options
        .api_base
        .clone()
        .or_else(|| env::var(API_BASE_ENV).ok().filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_owned())
}

async fn draft_and_open<S: ProjectService + 'static>(
    service: Rc<S>,
    options: &CliOptions,
) -> Result<(), Box<dyn Error>> {
    let mut seed = options.idea.clone().unwrap_or_default();
    if let Some(document) = &options.document {
        let text = load_document(service.as_ref(), Path::new(document)).await?;
        if !seed.trim().is_empty() {
            seed.push_str("\n\n");
        }
        seed.push_str(&text);
    }

    let mut input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    let mode = options.mode.unwrap_or_default();
    let snapshot = run_drafting(service.as_ref(), mode, Some(seed), &mut input, &mut output).await?;

    mindweave::tui::run_map(service, snapshot, true).await
}

async fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    if options.demo {
        if options.wants_draft() {
            return draft_and_open(Rc::new(InMemoryProjectService::new()), &options).await;
        }
        let (service, project_id) = InMemoryProjectService::with_demo_project();
        let service = Rc::new(service);
        let snapshot = service.get_project(&project_id).await?;
        return mindweave::tui::run_map(service, snapshot, true).await;
    }

    let base = api_base(&options);
    tracing::info!(api_base = %base, "using project service");
    let service = Rc::new(HttpProjectService::new(base, DEFAULT_TIMEOUT)?);

    match &options.project {
        Some(project) => {
            let project_id = ProjectId::new(project.as_str())?;
            let snapshot = service.get_project(&project_id).await?;
            mindweave::tui::run_map(service, snapshot, false).await
        }
        None => draft_and_open(service, &options).await,
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = env::args();
        let program = args.next().unwrap_or_else(|| "mindweave".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        init_logging()?;

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let local = tokio::task::LocalSet::new();
        local.block_on(&runtime, run(options))
    })();

    if let Err(err) = result {
        eprintln!("mindweave: {err}");
        std::process::exit(1);
    }
}
