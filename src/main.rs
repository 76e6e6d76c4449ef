use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use brand_console::{
    api::{BrandApi, HttpBrandApi},
    config::{self, AppConfig},
    controller::{BrandListController, BrandListView, Confirm, DeleteOutcome, FetchOutcome},
    display::{format_display_date, status_label},
    form::{BrandForm, SubmitOutcome, LOAD_BRAND_FAILED},
    models::{Brand, BrandId, ChainId, Company},
    notifier::{ConsoleNotifier, Notifier},
    validation::FormErrors,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize()?;

    match cli.command {
        Commands::List(args) => handle_list(&context, args, cli.json).await?,
        Commands::Companies => handle_companies(&context, cli.json).await?,
        Commands::Show(args) => handle_show(&context, args, cli.json).await?,
        Commands::Create(args) => handle_create(&context, args, cli.json).await?,
        Commands::Edit(args) => handle_edit(&context, args, cli.json).await?,
        Commands::Delete(args) => handle_delete(&context, args).await?,
    }

    Ok(())
}

#[derive(Parser)]
#[command(name = "brand-console", about = "Manage brands and their companies", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List brands, optionally filtered by company and search text
    List(ListArgs),
    /// List companies available for brand assignment
    Companies,
    /// Show a single brand
    Show(ShowArgs),
    /// Create a brand
    Create(CreateArgs),
    /// Edit an existing brand
    Edit(EditArgs),
    /// Delete a brand after confirmation
    Delete(DeleteArgs),
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, help = "Only show brands of this company id")]
    company: Option<ChainId>,
    #[arg(long, help = "Case-insensitive match on brand or company name")]
    search: Option<String>,
}

#[derive(Args)]
struct ShowArgs {
    id: BrandId,
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long, help = "Brand name (1-50 characters)")]
    name: String,
    #[arg(long, help = "Owning company id")]
    company: Option<ChainId>,
}

#[derive(Args)]
struct EditArgs {
    id: BrandId,
    #[arg(long, help = "New brand name")]
    name: Option<String>,
    #[arg(long, help = "New owning company id")]
    company: Option<ChainId>,
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "inactive", help = "Mark the brand active")]
    active: bool,
    #[arg(long, action = ArgAction::SetTrue, help = "Mark the brand inactive")]
    inactive: bool,
}

#[derive(Args)]
struct DeleteArgs {
    id: BrandId,
    #[arg(long, action = ArgAction::SetTrue, help = "Skip the confirmation prompt")]
    yes: bool,
}

struct CliContext {
    config: AppConfig,
    api: Arc<dyn BrandApi>,
    notifier: Arc<dyn Notifier>,
}

impl CliContext {
    fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let api = HttpBrandApi::from_config(&config).context("failed to build API client")?;
        debug!(target: "brand_console", base_url = api.base_url(), env = %config.environment, "client ready");

        Ok(Self {
            config,
            api: Arc::new(api),
            notifier: Arc::new(ConsoleNotifier),
        })
    }

    fn list_controller(&self) -> BrandListController {
        BrandListController::new(self.api.clone(), self.notifier.clone())
    }
}

/// Confirms on the terminal unless `--yes` was given.
struct PromptConfirm {
    assume_yes: bool,
}

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        prompt_blocking(|| {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .unwrap_or(false)
        })
    }
}

/// Runs a terminal prompt without stalling the runtime's other tasks.
fn prompt_blocking<F>(prompt: F) -> bool
where
    F: FnOnce() -> bool,
{
    tokio::task::block_in_place(prompt)
}

async fn handle_list(context: &CliContext, args: ListArgs, json: bool) -> Result<()> {
    let controller = context.list_controller();

    let fetch = match controller.set_company_filter(args.company).await {
        Some(fetch) => {
            controller.load_companies().await;
            fetch
        }
        None => controller.mount().await,
    };
    if let Some(search) = args.search {
        controller.set_search(search).await;
    }

    let outcome = fetch.wait().await?;
    let view = controller.snapshot().await;

    if json {
        print_json(&view)?;
    } else {
        render_brand_table(&view);
    }

    match outcome {
        FetchOutcome::Failed(err) => {
            Err(anyhow!(err).context(format!("failed to list brands from {}", context.config.api_base_url)))
        }
        FetchOutcome::Loaded { .. } | FetchOutcome::Discarded => Ok(()),
    }
}

async fn handle_companies(context: &CliContext, json: bool) -> Result<()> {
    let controller = context.list_controller();
    controller.load_companies().await;
    let companies = controller.snapshot().await.companies;

    if json {
        print_json(&companies)?;
    } else if companies.is_empty() {
        println!("No companies available.");
    } else {
        for company in &companies {
            render_company(company);
        }
    }
    Ok(())
}

async fn handle_show(context: &CliContext, args: ShowArgs, json: bool) -> Result<()> {
    let brand = match context.api.get_brand(args.id).await {
        Ok(brand) => brand,
        Err(err) => {
            context.notifier.error(LOAD_BRAND_FAILED);
            return Err(err).with_context(|| format!("failed to fetch brand {}", args.id));
        }
    };

    if json {
        print_json(&brand)?;
    } else {
        render_brand(&brand);
    }
    Ok(())
}

async fn handle_create(context: &CliContext, args: CreateArgs, json: bool) -> Result<()> {
    let form = BrandForm::open_create(context.api.clone(), context.notifier.clone())
        .await
        .context("cannot open the create form")?;

    form.set_brand_name(args.name).await;
    form.set_company(args.company).await;

    finish_submit(&form, json).await
}

async fn handle_edit(context: &CliContext, args: EditArgs, json: bool) -> Result<()> {
    let form = BrandForm::open_edit(context.api.clone(), context.notifier.clone(), args.id)
        .await
        .with_context(|| format!("cannot open brand {} for editing", args.id))?;

    if let Some(name) = args.name {
        form.set_brand_name(name).await;
    }
    if let Some(company) = args.company {
        form.set_company(Some(company)).await;
    }
    if args.active {
        form.set_active(true).await;
    } else if args.inactive {
        form.set_active(false).await;
    }

    finish_submit(&form, json).await
}

async fn finish_submit(form: &BrandForm, json: bool) -> Result<()> {
    let label = form.submit_label().await;
    debug!(target: "brand_console", action = label, "submitting brand form");

    match form.submit().await {
        SubmitOutcome::Saved(brand) => {
            if json {
                print_json(&brand)?;
            } else {
                render_brand(&brand);
            }
            Ok(())
        }
        SubmitOutcome::Invalid(errors) => {
            render_form_errors(&errors);
            bail!("brand form has {} invalid field(s)", errors.len())
        }
        SubmitOutcome::Busy => bail!("a submission is already in progress"),
        SubmitOutcome::Failed(err) => {
            render_form_errors(&form.errors().await);
            Err(err).context("brand was not saved")
        }
    }
}

async fn handle_delete(context: &CliContext, args: DeleteArgs) -> Result<()> {
    let controller = context.list_controller();
    if let FetchOutcome::Failed(err) = controller.refresh().await.wait().await? {
        return Err(err).context("failed to load the brand list");
    }

    let confirm = PromptConfirm {
        assume_yes: args.yes,
    };
    match controller.delete_brand(args.id, &confirm).await {
        DeleteOutcome::Deleted { refresh } => {
            refresh.wait().await?;
            Ok(())
        }
        DeleteOutcome::Cancelled => {
            println!("Delete cancelled.");
            Ok(())
        }
        DeleteOutcome::AlreadyInProgress => bail!("brand {} is already being deleted", args.id),
        DeleteOutcome::UnknownBrand => bail!("brand {} is not in the current list", args.id),
        DeleteOutcome::Failed(err) => {
            Err(err).with_context(|| format!("failed to delete brand {}", args.id))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_brand_table(view: &BrandListView) {
    if view.rows.is_empty() {
        println!("No brands matched the current filters.");
    } else {
        println!(
            "{:>4}  {:<50}  {:<24}  {:<8}  {:<11}  {:<11}",
            "#", "Name", "Company", "Status", "Created", "Updated"
        );
        for row in &view.rows {
            let brand = &row.brand;
            println!(
                "{:>4}  {:<50}  {:<24}  {:<8}  {:<11}  {:<11}{}",
                row.position,
                brand.brand_name,
                brand.chain_name,
                status_label(brand.is_active),
                format_display_date(brand.created_at.as_ref()),
                format_display_date(brand.updated_at.as_ref()),
                if row.deleting { "  (deleting)" } else { "" }
            );
        }
    }

    if let Some(label) = &view.shown_label {
        println!("{}", label);
    }
    if view.has_active_filters {
        let company = view
            .company_filter
            .map(|id| company_name(&view.companies, id))
            .unwrap_or_else(|| "all".to_string());
        println!("Filters: company={} search={:?}", company, view.search);
    }
}

fn company_name(companies: &[Company], chain_id: ChainId) -> String {
    companies
        .iter()
        .find(|company| company.chain_id == chain_id)
        .map(|company| company.chain_name.clone())
        .unwrap_or_else(|| chain_id.to_string())
}

fn render_brand(brand: &Brand) {
    println!(
        "- Brand {} • {} • company {} ({}) • {}",
        brand.brand_id,
        brand.brand_name,
        brand.chain_name,
        brand.chain_id,
        status_label(brand.is_active)
    );
    println!(
        "  created {} • updated {}",
        format_display_date(brand.created_at.as_ref()),
        format_display_date(brand.updated_at.as_ref())
    );
}

fn render_company(company: &Company) {
    println!("- Company {} • {}", company.chain_id, company.chain_name);
}

fn render_form_errors(errors: &FormErrors) {
    for (field, message) in errors.iter() {
        eprintln!("  {}: {}", field, message);
    }
}
