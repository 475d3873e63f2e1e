use crate::export::ExportFormat;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for rollbook
/// School roster, timetable and attendance book on SQLite
#[derive(Parser)]
#[command(
    name = "rollbook",
    version = env!("CARGO_PKG_VERSION"),
    about = "School roll book: import rosters and timetables, record attendance and build the monthly matrícula report",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the configured academic year (YYYY-YYYY)
    #[arg(global = true, long = "academic-year", value_name = "YYYY-YYYY")]
    pub academic_year: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,

        #[arg(
            long = "init-aliases",
            help = "Write the built-in name aliases to the aliases file"
        )]
        init_aliases: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity and pending migrations")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(
            long,
            value_name = "PREFIX",
            requires = "print",
            help = "Only operations starting with PREFIX (e.g. import, summary)"
        )]
        operation: Option<String>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE", help = "Absolute destination path")]
        file: String,

        #[arg(long, help = "Compress the backup into a .zip archive")]
        compress: bool,

        #[arg(long, help = "Overwrite an existing destination without asking")]
        force: bool,
    },

    /// Import spreadsheets (student roster or section timetable)
    Import {
        #[command(subcommand)]
        kind: ImportKind,
    },

    /// Provision and list reference data used by the importers
    Refs {
        #[command(subcommand)]
        action: RefsAction,
    },

    /// Show the stored timetable of a section
    Timetable {
        #[arg(long, help = "Section name, e.g. \"1° año\"")]
        section: String,
    },

    /// Record or inspect daily attendance
    Attendance {
        #[command(subcommand)]
        action: AttendanceAction,
    },

    /// Compute (or list) the monthly per-grade attendance summaries
    Summary {
        #[arg(long, value_name = "YYYY-MM")]
        month: String,

        #[arg(long, help = "Only this grade level (0-11)")]
        grade: Option<u8>,

        #[arg(long = "working-days", help = "Override the computed number of working days")]
        working_days: Option<i64>,

        #[arg(long = "by", help = "Recorded as calculated_by (default from config)")]
        by: Option<String>,

        #[arg(long, help = "List stored summaries instead of computing them")]
        list: bool,
    },

    /// Chronic-absence alerts
    Alerts {
        #[arg(long, help = "Scan active students and raise or refresh alerts")]
        scan: bool,

        #[arg(long = "as-of", value_name = "YYYY-MM-DD", help = "Last day of the scan window (default: today)")]
        as_of: Option<String>,

        #[arg(long, help = "Window length in days (default from config)")]
        days: Option<i64>,

        #[arg(long, help = "List active alerts")]
        list: bool,
    },

    /// Export the monthly matrícula report
    Export {
        #[arg(long, value_name = "YYYY-MM")]
        month: String,

        #[arg(long, value_enum, default_value = "xlsx")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Absolute output path")]
        file: String,

        #[arg(long, help = "Overwrite an existing file without asking")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ImportKind {
    /// Student roster (one student per row, header row after the title rows)
    Roster {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Worksheet name (default: first sheet)")]
        sheet: Option<String>,

        #[arg(long = "skip-rows", help = "Title rows above the header (default from config)")]
        skip_rows: Option<usize>,

        #[arg(long = "enrollment-date", value_name = "YYYY-MM-DD")]
        enrollment_date: Option<String>,
    },

    /// Weekly timetable of one section (replaces its current assignments)
    Schedule {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Worksheet name (default: first sheet)")]
        sheet: Option<String>,

        #[arg(long, help = "Target section name, e.g. \"1° año\"")]
        section: String,

        #[arg(long = "header-rows", help = "Rows above the first period (default from config)")]
        header_rows: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RefKind {
    Sections,
    Teachers,
    Subjects,
    Periods,
    Classrooms,
}

#[derive(Subcommand)]
pub enum RefsAction {
    /// List one kind of reference rows
    List {
        #[arg(value_enum)]
        kind: RefKind,
    },

    /// Add a teacher (canonical name)
    AddTeacher { name: String },

    /// Add a subject (canonical name)
    AddSubject { name: String },

    /// Add a time period
    AddPeriod {
        name: String,

        #[arg(long, value_name = "HH:MM")]
        start: String,

        #[arg(long, value_name = "HH:MM")]
        end: String,

        #[arg(long = "break", help = "Mark the period as a break")]
        is_break: bool,
    },

    /// Add a classroom
    AddClassroom {
        name: String,

        #[arg(long)]
        capacity: Option<i64>,
    },

    /// Add a section (grade 0-11, optional letter A-D)
    AddSection {
        #[arg(long)]
        grade: u8,

        #[arg(long)]
        letter: Option<String>,

        #[arg(long, help = "Display name (default: derived from grade and letter)")]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AttendanceAction {
    /// Mark one day for a whole section (everyone present unless listed)
    Mark {
        #[arg(long)]
        section: String,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: String,

        #[arg(long, value_delimiter = ',', help = "Absent student ids (comma separated)")]
        absent: Vec<i64>,

        #[arg(long, value_delimiter = ',', help = "Excused absence student ids")]
        excused: Vec<i64>,

        #[arg(long, value_delimiter = ',', help = "Late arrival student ids")]
        late: Vec<i64>,

        #[arg(long = "by", help = "Id of the teacher recording the day")]
        by: Option<i64>,
    },

    /// Attendance percentage of a student over a period
    Show {
        #[arg(long)]
        student: i64,

        #[arg(long, help = "YYYY-MM, YYYY-MM-DD or a FROM:TO range")]
        period: String,
    },
}
