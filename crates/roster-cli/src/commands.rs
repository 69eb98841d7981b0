//! One-shot subcommands printing plain text.

use anyhow::{Context, Result, bail};
use clap::{Subcommand, ValueEnum};
use roster_core::{
  field::PrivacyField,
  filter::ViewRecord,
  reference::{NewReference, ReferenceKind},
  search::SearchMode,
};
use uuid::Uuid;

use crate::{
  client::{ApiClient, StudentQuery},
  render, toggle,
};

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Show who the configured credentials belong to.
  Me,

  /// List students, optionally filtered.
  Students {
    #[command(flatten)]
    filters: Filters,
  },

  /// Show one student.
  Show { id: Uuid },

  /// Search students by text; only fields visible to you are matched.
  Search {
    term: String,
    #[arg(long, value_enum, default_value_t = Mode::Or)]
    mode: Mode,
    #[command(flatten)]
    filters: Filters,
  },

  /// Show or change your privacy settings.
  Privacy {
    #[command(subcommand)]
    action: Option<PrivacyAction>,
  },

  /// Reference data: campus, department, course, major.
  Ref {
    kind: String,
    #[command(subcommand)]
    action: RefAction,
  },
}

#[derive(clap::Args, Debug, Default)]
pub struct Filters {
  #[arg(long)]
  campus:         Option<Uuid>,
  #[arg(long)]
  course:         Option<Uuid>,
  #[arg(long)]
  major:          Option<Uuid>,
  #[arg(long)]
  department:     Option<Uuid>,
  #[arg(long)]
  year:           Option<i32>,
  /// Include alumni (admins only).
  #[arg(long)]
  include_alumni: bool,
  #[arg(long)]
  limit:          Option<usize>,
  #[arg(long)]
  offset:         Option<usize>,
}

impl From<&Filters> for StudentQuery {
  fn from(f: &Filters) -> Self {
    Self {
      campus_id:         f.campus,
      course_id:         f.course,
      major_id:          f.major,
      department_id:     f.department,
      year_of_admission: f.year,
      include_alumni:    f.include_alumni,
      limit:             f.limit,
      offset:            f.offset,
    }
  }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Mode {
  And,
  Or,
  Not,
}

impl From<Mode> for SearchMode {
  fn from(m: Mode) -> Self {
    match m {
      Mode::And => SearchMode::And,
      Mode::Or => SearchMode::Or,
      Mode::Not => SearchMode::Not,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum PrivacyAction {
  /// Mark a field public or private.
  Set { field: String, visibility: Visibility },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
  Public,
  Private,
}

#[derive(Subcommand, Debug)]
pub enum RefAction {
  List,
  Add {
    name:        String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    parent:      Option<Uuid>,
  },
}

pub async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Me => {
      let me = client.me().await?;
      match me.user {
        Some(user) => {
          println!("{} ({}, id {})", user.email, user.role.as_str(), user.id);
          if let Some(student_id) = me.student_id {
            println!("student {student_id}");
          }
        }
        None => println!("anonymous"),
      }
    }

    Command::Students { filters } => {
      let students = client.list_students(&StudentQuery::from(&filters)).await?;
      print_list(&students);
    }

    Command::Show { id } => {
      let record = client.get_student(id).await?;
      for (label, value) in render::detail_rows(&record) {
        println!("{label:<18}{value}");
      }
    }

    Command::Search { term, mode, filters } => {
      let students = client
        .search(&term, mode.into(), &StudentQuery::from(&filters))
        .await?;
      print_list(&students);
    }

    Command::Privacy { action: None } => {
      let settings = client.privacy_settings().await?;
      for row in settings.iter() {
        let state = if row.is_private { "private" } else { "public" };
        println!("{:<36}{state}", row.field_name.as_str());
      }
    }

    Command::Privacy { action: Some(PrivacyAction::Set { field, visibility }) } => {
      let field = PrivacyField::parse(&field)?;
      let user_id = client
        .me()
        .await?
        .user
        .map(|u| u.id)
        .context("privacy settings need credentials")?;
      let mut settings = client.privacy_settings().await?;
      toggle::set_field(client, &mut settings, user_id, field, visibility == Visibility::Private)
        .await?;
      println!("{field}: {}", if visibility == Visibility::Private { "private" } else { "public" });
    }

    Command::Ref { kind, action } => {
      let kind = reference_kind(&kind)?;
      match action {
        RefAction::List => {
          for item in client.list_references(kind).await? {
            println!("{}  {}", item.id, item.name);
          }
        }
        RefAction::Add { name, description, parent } => {
          let item = client
            .create_reference(kind, &NewReference { name, description, parent_id: parent })
            .await?;
          println!("created {} {} ({})", kind.as_str(), item.name, item.id);
        }
      }
    }
  }
  Ok(())
}

/// Accept both `campus` and `campuses`.
fn reference_kind(s: &str) -> Result<ReferenceKind> {
  match ReferenceKind::parse(s).or_else(|_| ReferenceKind::from_plural(s)) {
    Ok(kind) => Ok(kind),
    Err(_) => bail!("unknown reference kind: {s} (expected campus, department, course or major)"),
  }
}

fn print_list(students: &[ViewRecord]) {
  for record in students {
    let id = render::record_id(record).map(|id| id.to_string()).unwrap_or_default();
    println!("{id}  {}", render::list_label(record));
  }
  println!("{} student(s)", students.len());
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reference_kind_accepts_singular_and_plural() {
    assert_eq!(reference_kind("campus").unwrap(), ReferenceKind::Campus);
    assert_eq!(reference_kind("majors").unwrap(), ReferenceKind::Major);
    assert!(reference_kind("buildings").is_err());
  }
}
