//! services/dashboard/src/cli.rs
//!
//! Command-line front end over the loaders. Parsing is clap derive; each
//! command loads what it needs, then prints plain text.

use crate::error::DashboardError;
use crate::loaders::{self, ClientDetail};
use crate::state::AppState;
use clap::{Parser, Subcommand};
use practice_core::domain::{
    parse_timestamp, AssignMaterial, Client, DifficultyLevel, EntityId, Material, MaterialInput,
    NewClient, RegisterTherapist, Session, SessionInput, SessionStatus,
};
use practice_core::ports::PortError;
use practice_core::views::{self, CategoryFilter, DashboardSummary};
use std::fmt::Write as _;

#[derive(Debug, Parser)]
#[command(name = "dashboard")]
#[command(about = "Therapy practice dashboard: clients, sessions and materials", long_about = None)]
pub struct Cli {
    /// Therapist email used to log in.
    #[arg(long, global = true, env = "THERAPIST_EMAIL")]
    pub email: Option<String>,
    /// Therapist password used to log in.
    #[arg(long, global = true, env = "THERAPIST_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a therapist account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        specialization: Option<String>,
    },
    /// List clients
    Clients {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one client with their sessions and assigned materials
    Client { id: EntityId },
    /// Add a client
    AddClient {
        #[arg(long)]
        name: String,
        #[arg(long = "client-email")]
        client_email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long = "client-password")]
        client_password: String,
    },
    /// Delete a client
    DeleteClient { id: EntityId },
    /// List sessions
    Sessions {
        /// Group the listing by calendar day.
        #[arg(long)]
        by_date: bool,
    },
    /// Schedule a session for the logged-in therapist
    Schedule {
        #[arg(long)]
        client: EntityId,
        /// e.g. 2024-05-01T14:00
        #[arg(long)]
        at: String,
        #[arg(long, default_value_t = practice_core::domain::DEFAULT_SESSION_MINUTES)]
        duration: u32,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change a session's status
    SetStatus { id: EntityId, status: String },
    /// Delete a session
    DeleteSession { id: EntityId },
    /// List materials
    Materials {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Add a material
    AddMaterial {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Assign a material to a client
    Assign {
        #[arg(long)]
        material: EntityId,
        #[arg(long)]
        client: EntityId,
        #[arg(long)]
        feedback: Option<String>,
    },
    /// Print the dashboard summary
    Summary,
}

/// Runs one parsed command to completion.
pub async fn run(state: &AppState, cli: Cli) -> Result<(), DashboardError> {
    if let Commands::Register { name, specialization } = &cli.command {
        let (email, password) = credentials(state, &cli)?;
        let therapist = loaders::register(
            state,
            &RegisterTherapist {
                name: name.clone(),
                email: email.to_string(),
                password: password.to_string(),
                specialization: specialization.clone(),
            },
        )
        .await?;
        println!("Registered {} <{}> (id {}).", therapist.name, therapist.email, therapist.id);
        return Ok(());
    }

    let (email, password) = credentials(state, &cli)?;
    let therapist = loaders::login(state, email, password).await?;

    match cli.command {
        Commands::Register { .. } => {}
        Commands::Clients { search } => {
            loaders::load_clients(state).await?;
            let clients = state.clients.snapshot();
            print!("{}", render_clients(&views::search_clients(clients.items(), &search)));
        }
        Commands::Client { id } => {
            let detail = loaders::load_client_detail(state, id).await?;
            print!("{}", render_client_detail(&detail));
        }
        Commands::AddClient {
            name,
            client_email,
            phone,
            client_password,
        } => {
            let client = loaders::create_client(
                state,
                &NewClient {
                    name,
                    email: client_email,
                    phone,
                    password: client_password,
                },
            )
            .await?;
            println!("Added client {} (id {}).", client.name, client.id);
        }
        Commands::DeleteClient { id } => {
            loaders::delete_client(state, id).await?;
            println!("Deleted client {}.", id);
        }
        Commands::Sessions { by_date } => {
            loaders::load_sessions(state).await?;
            let sessions = state.sessions.snapshot();
            if by_date {
                print!("{}", render_sessions_by_date(sessions.items()));
            } else {
                print!("{}", render_sessions(sessions.items()));
            }
        }
        Commands::Schedule {
            client,
            at,
            duration,
            notes,
        } => {
            let at = parse_timestamp(&at).map_err(PortError::from)?;
            let mut input = SessionInput::scheduled(client, therapist.id, at);
            input.duration = duration;
            input.notes = notes;
            let session = loaders::create_session(state, &input).await?;
            println!(
                "Scheduled session {} on {}.",
                session.id,
                session.session_date.format("%Y-%m-%d %H:%M")
            );
        }
        Commands::SetStatus { id, status } => {
            let status = status.parse::<SessionStatus>().map_err(PortError::from)?;
            let current = state.session_api.get_session(id).await?;
            let mut input = SessionInput::from(&current);
            input.status = status;
            let session = loaders::update_session(state, id, &input).await?;
            println!("Session {} is now {}.", session.id, session.status);
        }
        Commands::DeleteSession { id } => {
            loaders::delete_session(state, id).await?;
            println!("Deleted session {}.", id);
        }
        Commands::Materials { search, category } => {
            loaders::load_materials(state).await?;
            let materials = state.materials.snapshot();
            let filter = CategoryFilter::parse(&category);
            let hits = views::filter_materials(materials.items(), &search, &filter);
            print!("{}", render_materials(&hits));
            let categories = views::material_categories(materials.items());
            if !categories.is_empty() {
                println!("Categories: all, {}", categories.join(", "));
            }
        }
        Commands::AddMaterial {
            title,
            content,
            category,
            difficulty,
        } => {
            let difficulty_level = difficulty
                .map(|raw| raw.parse::<DifficultyLevel>())
                .transpose()
                .map_err(PortError::from)?;
            let material = loaders::create_material(
                state,
                &MaterialInput {
                    title,
                    content,
                    category,
                    difficulty_level,
                },
            )
            .await?;
            println!("Added material {} (id {}).", material.title, material.id);
        }
        Commands::Assign {
            material,
            client,
            feedback,
        } => {
            let assignment = loaders::assign_material(
                state,
                &AssignMaterial {
                    material_id: material,
                    client_id: client,
                    ai_feedback: feedback,
                },
            )
            .await?;
            println!(
                "Assigned material {} to client {}.",
                assignment.material_id, assignment.client_id
            );
        }
        Commands::Summary => {
            loaders::load_all(state).await?;
            print!("{}", render_summary(&loaders::dashboard(state)));
        }
    }
    Ok(())
}

fn credentials<'a>(state: &'a AppState, cli: &'a Cli) -> Result<(&'a str, &'a str), DashboardError> {
    match (cli.email.as_deref(), cli.password.as_deref()) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Ok(state.config.credentials()?),
    }
}

//=========================================================================================
// Rendering
//=========================================================================================

pub fn render_clients(clients: &[&Client]) -> String {
    if clients.is_empty() {
        return "No clients found.\n".to_string();
    }
    let mut out = String::new();
    for client in clients {
        let _ = writeln!(
            out,
            "{:>5}  {:<24} {:<32} {}",
            client.id,
            client.name,
            client.email,
            client.phone.as_deref().unwrap_or("-")
        );
    }
    out
}

fn session_line(out: &mut String, session: &Session) {
    let client = session
        .client
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("-");
    let _ = writeln!(
        out,
        "{:>5}  {}  {:>3} min  {:<10} {}",
        session.id,
        session.session_date.format("%Y-%m-%d %H:%M"),
        session.duration,
        session.status,
        client
    );
}

pub fn render_sessions(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return "No sessions found.\n".to_string();
    }
    let mut out = String::new();
    for session in sessions {
        session_line(&mut out, session);
    }
    out
}

pub fn render_sessions_by_date(sessions: &[Session]) -> String {
    if sessions.is_empty() {
        return "No sessions found.\n".to_string();
    }
    let mut out = String::new();
    for (date, group) in views::group_by_date(sessions) {
        let _ = writeln!(out, "{}", date.format("%A %Y-%m-%d"));
        for session in group {
            session_line(&mut out, session);
        }
    }
    out
}

pub fn render_materials(materials: &[&Material]) -> String {
    if materials.is_empty() {
        return "No materials found.\n".to_string();
    }
    let mut out = String::new();
    for material in materials {
        let _ = writeln!(
            out,
            "{:>5}  {:<32} {:<16} Difficulty: {}",
            material.id,
            material.title,
            material.category.as_deref().unwrap_or("-"),
            material
                .difficulty_level
                .map(|d| d.as_str())
                .unwrap_or("Not specified")
        );
    }
    out
}

pub fn render_client_detail(detail: &ClientDetail) -> String {
    let mut out = String::new();
    let client = &detail.client;
    let _ = writeln!(out, "{} <{}>", client.name, client.email);
    let _ = writeln!(out, "Phone: {}", client.phone.as_deref().unwrap_or("-"));
    if let Some(insights) = &client.ai_insights {
        let _ = writeln!(out, "AI insights: {}", insights);
    }

    let _ = writeln!(out, "\nSessions ({}):", detail.sessions.len());
    for session in &detail.sessions {
        session_line(&mut out, session);
        if let Some(notes) = &session.notes {
            let _ = writeln!(out, "       {}", notes);
        }
    }

    let progress = views::assignment_progress(&detail.assignments);
    let _ = writeln!(
        out,
        "\nAssigned materials ({} completed, {} in progress):",
        progress.completed, progress.in_progress
    );
    for assignment in &detail.assignments {
        let title = assignment
            .material
            .as_ref()
            .map(|m| m.title.clone())
            .unwrap_or_else(|| format!("material {}", assignment.material_id));
        let state = if assignment.is_completed() { "Completed" } else { "In Progress" };
        let _ = writeln!(
            out,
            "  {:<32} assigned {}  {}",
            title,
            assignment.assigned_at.format("%Y-%m-%d"),
            state
        );
        if let Some(feedback) = &assignment.ai_feedback {
            let _ = writeln!(out, "       {}", feedback);
        }
    }
    out
}

pub fn render_summary(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total clients:           {}", summary.total_clients);
    let _ = writeln!(out, "Upcoming sessions:       {}", summary.upcoming_sessions);
    let _ = writeln!(out, "Materials:               {}", summary.total_materials);
    let _ = writeln!(out, "Session completion rate: {}%", summary.completion_rate);

    if !summary.monthly.is_empty() {
        let _ = writeln!(out, "\nMonth      completed scheduled cancelled");
        for month in &summary.monthly {
            let _ = writeln!(
                out,
                "{} {:<5} {:>9} {:>9} {:>9}",
                month.label, month.year, month.completed, month.scheduled, month.cancelled
            );
        }
    }

    if !summary.recent.is_empty() {
        let _ = writeln!(out, "\nRecent sessions:");
        for session in &summary.recent {
            session_line(&mut out, session);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use practice_core::views::dashboard_summary;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_materials_filters() {
        let cli = Cli::try_parse_from([
            "dashboard", "--email", "grey@example.com", "--password", "pw", "materials", "--search",
            "breath", "--category", "anxiety",
        ])
        .unwrap();
        assert_eq!(cli.email.as_deref(), Some("grey@example.com"));
        match cli.command {
            Commands::Materials { search, category } => {
                assert_eq!(search, "breath");
                assert_eq!(category, "anxiety");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn summary_of_empty_stores_reports_zero_rate() {
        let text = render_summary(&dashboard_summary(&[], &[], &[]));
        assert!(text.contains("Session completion rate: 0%"));
        assert!(!text.contains("Recent sessions"));
    }

    #[test]
    fn empty_listings_say_so() {
        assert_eq!(render_clients(&[]), "No clients found.\n");
        assert_eq!(render_sessions(&[]), "No sessions found.\n");
        assert_eq!(render_materials(&[]), "No materials found.\n");
    }
}
