use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use healthyspine_api::{
    AddReminderRequest, CompanionApi, HttpIdentityProvider, RecordMoodRequest, RecordPainRequest,
    RecordSleepRequest, DEFAULT_AUTH_URL,
};
use healthyspine_core::{
    clock_label, metrics, BodyLocation, EntryId, MoodKind, ReminderDay, UserProfile,
};
use serde_json::Value;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Time};

const CLI_CONTRACT_VERSION: &str = "cli.v1";

#[derive(Debug, Parser)]
#[command(name = "hs")]
#[command(about = "HealthySpine companion CLI")]
struct Cli {
    #[arg(long, default_value = "./healthyspine.sqlite3")]
    db: PathBuf,

    #[arg(long, default_value = DEFAULT_AUTH_URL)]
    auth_url: String,

    #[arg(long, default_value = "")]
    api_key: String,

    #[arg(long)]
    google_id_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Db {
        #[command(subcommand)]
        command: Box<DbCommand>,
    },
    Pain {
        #[command(subcommand)]
        command: Box<PainCommand>,
    },
    Sleep {
        #[command(subcommand)]
        command: Box<SleepCommand>,
    },
    Sit {
        #[command(subcommand)]
        command: Box<SitCommand>,
    },
    Mood {
        #[command(subcommand)]
        command: Box<MoodCommand>,
    },
    Remind {
        #[command(subcommand)]
        command: Box<RemindCommand>,
    },
    Community {
        #[command(subcommand)]
        command: Box<CommunityCommand>,
    },
    Plan {
        #[command(subcommand)]
        command: Box<PlanCommand>,
    },
    Auth {
        #[command(subcommand)]
        command: Box<AuthCommand>,
    },
    Profile {
        #[command(subcommand)]
        command: Box<ProfileCommand>,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    SchemaVersion,
    Migrate(DbMigrateArgs),
    Backup(DbBackupArgs),
    Restore(DbRestoreArgs),
}

#[derive(Debug, Args)]
struct DbMigrateArgs {
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct DbBackupArgs {
    #[arg(long)]
    out: PathBuf,
}

#[derive(Debug, Args)]
struct DbRestoreArgs {
    #[arg(long = "in")]
    input: PathBuf,
}

#[derive(Debug, Subcommand)]
enum PainCommand {
    Record(PainRecordArgs),
    History,
    Summary,
}

#[derive(Debug, Args)]
struct PainRecordArgs {
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    level: u8,
    #[arg(long, value_enum)]
    location: LocationArg,
}

#[derive(Debug, Subcommand)]
enum SleepCommand {
    Record(SleepRecordArgs),
    History,
    Summary,
}

#[derive(Debug, Args)]
struct SleepRecordArgs {
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    bed: String,
    #[arg(long)]
    wake: String,
    #[arg(long)]
    quality: Option<u8>,
}

#[derive(Debug, Subcommand)]
enum SitCommand {
    Start,
    Stop,
    Status,
    Add(SitAddArgs),
    History,
    Summary,
}

#[derive(Debug, Args)]
struct SitAddArgs {
    #[arg(long, default_value_t = 0)]
    hours: u32,
    #[arg(long, default_value_t = 0)]
    minutes: u32,
    #[arg(long)]
    date: Option<String>,
}

#[derive(Debug, Subcommand)]
enum MoodCommand {
    Record(MoodRecordArgs),
    History,
    Streak,
}

#[derive(Debug, Args)]
struct MoodRecordArgs {
    #[arg(long)]
    date: Option<String>,
    #[arg(long, value_enum)]
    mood: MoodArg,
    #[arg(long, default_value = "")]
    journal: String,
}

#[derive(Debug, Subcommand)]
enum RemindCommand {
    Add(RemindAddArgs),
    Toggle(RemindIdArgs),
    Delete(RemindIdArgs),
    List,
}

#[derive(Debug, Args)]
struct RemindAddArgs {
    #[arg(long)]
    time: String,
    #[arg(long, default_value = "")]
    label: String,
    #[arg(long = "day", value_enum)]
    days: Vec<DayArg>,
}

#[derive(Debug, Args)]
struct RemindIdArgs {
    #[arg(long)]
    id: String,
}

#[derive(Debug, Subcommand)]
enum CommunityCommand {
    Post(CommunityPostArgs),
    Like(CommunityLikeArgs),
    Feed,
}

#[derive(Debug, Args)]
struct CommunityPostArgs {
    #[arg(long)]
    content: String,
}

#[derive(Debug, Args)]
struct CommunityLikeArgs {
    #[arg(long)]
    id: String,
}

#[derive(Debug, Subcommand)]
enum PlanCommand {
    List,
    Toggle(PlanToggleArgs),
    Reset(PlanIdArgs),
    Progress(PlanIdArgs),
}

#[derive(Debug, Args)]
struct PlanToggleArgs {
    #[arg(long)]
    exercise: String,
}

#[derive(Debug, Args)]
struct PlanIdArgs {
    #[arg(long)]
    plan: String,
}

#[derive(Debug, Subcommand)]
enum AuthCommand {
    SignIn(SignInArgs),
    SignUp(SignUpArgs),
    Google,
    SignOut,
    Whoami,
}

#[derive(Debug, Args)]
struct SignInArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

#[derive(Debug, Args)]
struct SignUpArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    Show,
    Save(ProfileSaveArgs),
}

#[derive(Debug, Args)]
struct ProfileSaveArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    age: String,
    #[arg(long)]
    gender: String,
    #[arg(long)]
    pain_history: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LocationArg {
    LowerBack,
    UpperBack,
    Neck,
    Shoulders,
}

impl LocationArg {
    fn into_location(self) -> BodyLocation {
        match self {
            Self::LowerBack => BodyLocation::LowerBack,
            Self::UpperBack => BodyLocation::UpperBack,
            Self::Neck => BodyLocation::Neck,
            Self::Shoulders => BodyLocation::Shoulders,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MoodArg {
    Happy,
    Calm,
    Neutral,
    Worried,
    Sad,
    Frustrated,
    InPain,
    Tired,
}

impl MoodArg {
    fn into_mood(self) -> MoodKind {
        match self {
            Self::Happy => MoodKind::Happy,
            Self::Calm => MoodKind::Calm,
            Self::Neutral => MoodKind::Neutral,
            Self::Worried => MoodKind::Worried,
            Self::Sad => MoodKind::Sad,
            Self::Frustrated => MoodKind::Frustrated,
            Self::InPain => MoodKind::InPain,
            Self::Tired => MoodKind::Tired,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DayArg {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl DayArg {
    fn into_day(self) -> ReminderDay {
        match self {
            Self::Mon => ReminderDay::Mon,
            Self::Tue => ReminderDay::Tue,
            Self::Wed => ReminderDay::Wed,
            Self::Thu => ReminderDay::Thu,
            Self::Fri => ReminderDay::Fri,
            Self::Sat => ReminderDay::Sat,
            Self::Sun => ReminderDay::Sun,
        }
    }
}

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const HHMM_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]");

fn parse_date(value: &str) -> Result<Date> {
    Date::parse(value, DATE_FORMAT)
        .with_context(|| format!("invalid date (expected YYYY-MM-DD): {value}"))
}

fn parse_date_opt(value: Option<&String>) -> Result<Option<Date>> {
    value.map(|raw| parse_date(raw)).transpose()
}

fn parse_hhmm(value: &str) -> Result<Time> {
    Time::parse(value, HHMM_FORMAT)
        .with_context(|| format!("invalid time (expected HH:MM): {value}"))
}

fn parse_entry_id(value: &str) -> Result<EntryId> {
    value.parse().with_context(|| format!("invalid entry id: {value}"))
}

fn with_contract_version(value: Value) -> Value {
    match value {
        Value::Object(mut object) => {
            object.insert(
                "contract_version".to_string(),
                Value::String(CLI_CONTRACT_VERSION.to_string()),
            );
            Value::Object(object)
        }
        other => serde_json::json!({
            "contract_version": CLI_CONTRACT_VERSION,
            "payload": other
        }),
    }
}

fn emit_json(value: Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&with_contract_version(value))?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let api = CompanionApi::new(cli.db.clone());
    match cli.command {
        Command::Db { command } => run_db(*command, &api),
        Command::Pain { command } => run_pain(*command, &api),
        Command::Sleep { command } => run_sleep(*command, &api),
        Command::Sit { command } => run_sit(*command, &api),
        Command::Mood { command } => run_mood(*command, &api),
        Command::Remind { command } => run_remind(*command, &api),
        Command::Community { command } => run_community(*command, &api),
        Command::Plan { command } => run_plan(*command, &api),
        Command::Auth { command } => {
            let provider = HttpIdentityProvider::new(
                cli.auth_url.clone(),
                cli.api_key.clone(),
                cli.google_id_token.clone(),
            );
            run_auth(*command, &api, &provider)
        }
        Command::Profile { command } => run_profile(*command, &api),
    }
}

fn run_db(command: DbCommand, api: &CompanionApi) -> Result<()> {
    match command {
        DbCommand::SchemaVersion => {
            let status = api.schema_status()?;
            emit_json(serde_json::json!({
                "current_version": status.current_version,
                "target_version": status.target_version,
                "pending_versions": status.pending_versions,
                "up_to_date": status.pending_versions.is_empty()
            }))
        }
        DbCommand::Migrate(args) => {
            let result = api.migrate(args.dry_run)?;
            emit_json(serde_json::to_value(&result)?)
        }
        DbCommand::Backup(args) => {
            api.backup(&args.out)?;
            emit_json(serde_json::json!({ "backup": args.out.display().to_string() }))
        }
        DbCommand::Restore(args) => {
            api.restore(&args.input)?;
            emit_json(serde_json::json!({ "restored": args.input.display().to_string() }))
        }
    }
}

fn run_pain(command: PainCommand, api: &CompanionApi) -> Result<()> {
    match command {
        PainCommand::Record(args) => {
            let entry = api.record_pain(RecordPainRequest {
                date: parse_date_opt(args.date.as_ref())?,
                level: args.level,
                location: args.location.into_location(),
            })?;
            emit_json(serde_json::json!({ "recorded": entry }))
        }
        PainCommand::History => {
            let entries = api.pain_history()?;
            let mut items = Vec::with_capacity(entries.len());
            for entry in &entries {
                let mut item = serde_json::to_value(entry)?;
                if let Value::Object(fields) = &mut item {
                    fields.insert(
                        "locationLabel".to_string(),
                        Value::String(entry.location.label().to_string()),
                    );
                }
                items.push(item);
            }
            emit_json(serde_json::json!({ "count": items.len(), "entries": items }))
        }
        PainCommand::Summary => emit_json(serde_json::to_value(api.pain_summary()?)?),
    }
}

fn run_sleep(command: SleepCommand, api: &CompanionApi) -> Result<()> {
    match command {
        SleepCommand::Record(args) => {
            let entry = api.record_sleep(RecordSleepRequest {
                date: parse_date_opt(args.date.as_ref())?,
                bed_time: parse_hhmm(&args.bed)?,
                wake_time: parse_hhmm(&args.wake)?,
                quality: args.quality,
            })?;
            emit_json(serde_json::json!({
                "recorded": entry,
                "duration_hours": entry.duration_hours()
            }))
        }
        SleepCommand::History => {
            let entries = api.sleep_history()?;
            let mut nights = Vec::with_capacity(entries.len());
            for entry in &entries {
                let mut night = serde_json::to_value(entry)?;
                if let Value::Object(fields) = &mut night {
                    fields.insert(
                        "durationHours".to_string(),
                        serde_json::json!(entry.duration_hours()),
                    );
                }
                nights.push(night);
            }
            emit_json(serde_json::json!({ "count": nights.len(), "entries": nights }))
        }
        SleepCommand::Summary => emit_json(serde_json::to_value(api.sleep_summary()?)?),
    }
}

fn run_sit(command: SitCommand, api: &CompanionApi) -> Result<()> {
    match command {
        SitCommand::Start => emit_json(serde_json::to_value(api.sitting_start(None)?)?),
        SitCommand::Stop => emit_json(serde_json::to_value(api.sitting_stop(None)?)?),
        SitCommand::Status => emit_json(serde_json::to_value(api.sitting_status(None)?)?),
        SitCommand::Add(args) => {
            let date = parse_date_opt(args.date.as_ref())?;
            let day = api.sitting_add(args.hours, args.minutes, date)?;
            emit_json(serde_json::json!({ "day": day }))
        }
        SitCommand::History => {
            let days = api.sitting_history()?;
            let mut items = Vec::with_capacity(days.len());
            for day in &days {
                let mut item = serde_json::to_value(day)?;
                if let Value::Object(fields) = &mut item {
                    fields.insert(
                        "durationLabel".to_string(),
                        Value::String(metrics::duration_label(day.duration)),
                    );
                }
                items.push(item);
            }
            emit_json(serde_json::json!({ "count": items.len(), "days": items }))
        }
        SitCommand::Summary => {
            let summary = api.sitting_summary(None)?;
            let mut value = serde_json::to_value(&summary)?;
            if let Value::Object(fields) = &mut value {
                fields.insert(
                    "today_label".to_string(),
                    Value::String(metrics::duration_label(summary.today_minutes)),
                );
            }
            emit_json(value)
        }
    }
}

fn run_mood(command: MoodCommand, api: &CompanionApi) -> Result<()> {
    match command {
        MoodCommand::Record(args) => {
            let entry = api.record_mood(RecordMoodRequest {
                date: parse_date_opt(args.date.as_ref())?,
                mood: args.mood.into_mood(),
                journal: args.journal,
            })?;
            emit_json(serde_json::json!({ "recorded": entry }))
        }
        MoodCommand::History => {
            let entries = api.mood_history()?;
            let mut items = Vec::with_capacity(entries.len());
            for entry in &entries {
                let mut item = serde_json::to_value(entry)?;
                if let Value::Object(fields) = &mut item {
                    fields.insert("emoji".to_string(), Value::String(entry.mood.emoji().to_string()));
                }
                items.push(item);
            }
            emit_json(serde_json::json!({ "count": items.len(), "entries": items }))
        }
        MoodCommand::Streak => {
            emit_json(serde_json::json!({ "streak_days": api.mood_streak()? }))
        }
    }
}

fn run_remind(command: RemindCommand, api: &CompanionApi) -> Result<()> {
    match command {
        RemindCommand::Add(args) => {
            let reminder = api.add_reminder(AddReminderRequest {
                time: parse_hhmm(&args.time)?,
                label: args.label,
                days: args.days.into_iter().map(DayArg::into_day).collect(),
            })?;
            emit_json(serde_json::json!({ "reminder": reminder }))
        }
        RemindCommand::Toggle(args) => {
            let reminder = api.toggle_reminder(parse_entry_id(&args.id)?)?;
            emit_json(serde_json::json!({
                "toggled": reminder.is_some(),
                "reminder": reminder
            }))
        }
        RemindCommand::Delete(args) => {
            let deleted = api.delete_reminder(parse_entry_id(&args.id)?)?;
            emit_json(serde_json::json!({ "deleted": deleted }))
        }
        RemindCommand::List => {
            let reminders = api.list_reminders()?;
            let mut items = Vec::with_capacity(reminders.len());
            for reminder in &reminders {
                let mut item = serde_json::to_value(reminder)?;
                if let Value::Object(fields) = &mut item {
                    fields.insert("daysLabel".to_string(), Value::String(reminder.days_label()));
                    fields.insert(
                        "timeLabel".to_string(),
                        Value::String(clock_label(reminder.time)),
                    );
                }
                items.push(item);
            }
            emit_json(serde_json::json!({ "count": items.len(), "reminders": items }))
        }
    }
}

fn run_community(command: CommunityCommand, api: &CompanionApi) -> Result<()> {
    match command {
        CommunityCommand::Post(args) => {
            let post = api.publish_post(&args.content, None)?;
            emit_json(serde_json::json!({ "post": post }))
        }
        CommunityCommand::Like(args) => {
            let post = api.toggle_like(parse_entry_id(&args.id)?, None)?;
            emit_json(serde_json::json!({ "toggled": post.is_some(), "post": post }))
        }
        CommunityCommand::Feed => {
            let posts = api.feed(None)?;
            emit_json(serde_json::json!({ "count": posts.len(), "posts": posts }))
        }
    }
}

fn run_plan(command: PlanCommand, api: &CompanionApi) -> Result<()> {
    match command {
        PlanCommand::List => {
            let plans = api.list_plans()?;
            emit_json(serde_json::json!({ "plans": plans }))
        }
        PlanCommand::Toggle(args) => {
            let exercise = api.toggle_exercise(&args.exercise)?;
            emit_json(serde_json::json!({ "exercise": exercise }))
        }
        PlanCommand::Reset(args) => {
            let cleared = api.reset_plan(&args.plan)?;
            emit_json(serde_json::json!({ "plan": args.plan, "cleared": cleared }))
        }
        PlanCommand::Progress(args) => emit_json(serde_json::to_value(api.plan_progress(&args.plan)?)?),
    }
}

fn run_auth(
    command: AuthCommand,
    api: &CompanionApi,
    provider: &HttpIdentityProvider,
) -> Result<()> {
    match command {
        AuthCommand::SignIn(args) => {
            let user = api.sign_in(provider, &args.email, &args.password)?;
            emit_json(serde_json::json!({ "user": user }))
        }
        AuthCommand::SignUp(args) => {
            let user = api.sign_up(provider, &args.name, &args.email, &args.password)?;
            emit_json(serde_json::json!({ "user": user }))
        }
        AuthCommand::Google => {
            let user = api.sign_in_with_google(provider)?;
            emit_json(serde_json::json!({ "user": user }))
        }
        AuthCommand::SignOut => {
            emit_json(serde_json::json!({ "signed_out": api.sign_out()? }))
        }
        AuthCommand::Whoami => {
            emit_json(serde_json::json!({ "user": api.current_user()? }))
        }
    }
}

fn run_profile(command: ProfileCommand, api: &CompanionApi) -> Result<()> {
    match command {
        ProfileCommand::Show => emit_json(serde_json::to_value(api.profile()?)?),
        ProfileCommand::Save(args) => {
            let profile = api.save_profile(UserProfile {
                name: args.name,
                email: args.email,
                age: args.age,
                gender: args.gender,
                pain_history: args.pain_history,
            })?;
            emit_json(serde_json::to_value(profile)?)
        }
    }
}
