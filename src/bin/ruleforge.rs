use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ruleforge::cli::{catalog_entries, emit, ensure_valid, read_json_file, render_json};
use ruleforge::{load_catalog, CompilerConfig, FormState, LoggingConfig, Rule, RuleCompiler};

#[derive(Parser)]
#[command(name = "ruleforge", version, about = "Rule expression compiler", author)]
struct Cli {
    /// 输出紧凑 JSON 而非格式化输出
    #[arg(long, global = true)]
    compact: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 从已存储规则构建编辑表单，或新建表单
    Form {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        rule: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 列出编辑表单的校验问题
    Validate {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        form: PathBuf,
    },
    /// 校验并将编辑表单编译为规则载荷
    Compile {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        form: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 将已存储规则转换为可移植文档
    Export {
        #[arg(long)]
        rule: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 将可移植文档解析回规则
    Import {
        #[arg(long)]
        doc: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 显示规范化后的目录
    Catalog {
        #[arg(long)]
        catalog: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let cli = Cli::parse();
    let pretty = !cli.compact;
    match cli.command {
        Command::Form {
            catalog,
            rule,
            output,
        } => handle_form(catalog, rule, output, pretty)?,
        Command::Validate { catalog, form } => handle_validate(catalog, form)?,
        Command::Compile {
            catalog,
            form,
            output,
        } => handle_compile(catalog, form, output, pretty)?,
        Command::Export { rule, output } => handle_export(rule, output, pretty)?,
        Command::Import { doc, output } => handle_import(doc, output, pretty)?,
        Command::Catalog { catalog } => handle_catalog(catalog)?,
    }
    Ok(())
}

fn compiler(catalog: &Path) -> anyhow::Result<RuleCompiler> {
    Ok(RuleCompiler::new(
        load_catalog(catalog)?,
        CompilerConfig::from_env(),
    ))
}

fn handle_form(
    catalog: PathBuf,
    rule: Option<PathBuf>,
    output: Option<PathBuf>,
    pretty: bool,
) -> anyhow::Result<()> {
    let compiler = compiler(&catalog)?;
    let rule: Option<Rule> = rule.map(|path| read_json_file(&path)).transpose()?;
    let form = compiler.build_form(rule.as_ref());
    if form.collapsed_nesting {
        eprintln!("warning: the rule mixes and/or groups; the flat condition list drops that grouping");
    }
    emit(&render_json(&form, pretty)?, output.as_deref())?;
    Ok(())
}

fn handle_validate(catalog: PathBuf, form: PathBuf) -> anyhow::Result<()> {
    let compiler = compiler(&catalog)?;
    let form: FormState = read_json_file(&form)?;
    let issues = compiler.validate(&form);
    if issues.is_empty() {
        println!("Form is valid");
        return Ok(());
    }
    for issue in &issues {
        println!("- {issue}");
    }
    ensure_valid(issues)?;
    Ok(())
}

fn handle_compile(
    catalog: PathBuf,
    form: PathBuf,
    output: Option<PathBuf>,
    pretty: bool,
) -> anyhow::Result<()> {
    let compiler = compiler(&catalog)?;
    let form: FormState = read_json_file(&form)?;
    let rule = compiler.compile(&form)?;
    emit(&render_json(&rule, pretty)?, output.as_deref())?;
    Ok(())
}

fn handle_export(rule: PathBuf, output: Option<PathBuf>, pretty: bool) -> anyhow::Result<()> {
    let rule: Rule = read_json_file(&rule)?;
    let doc = ruleforge::portable::serialize(&rule);
    emit(&render_json(&doc, pretty)?, output.as_deref())?;
    Ok(())
}

fn handle_import(doc: PathBuf, output: Option<PathBuf>, pretty: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&doc)?;
    let rule = ruleforge::portable::deserialize_str(&raw)?;
    emit(&render_json(&rule, pretty)?, output.as_deref())?;
    Ok(())
}

fn handle_catalog(catalog: PathBuf) -> anyhow::Result<()> {
    let catalog = load_catalog(&catalog)?;
    let entries = catalog_entries(&catalog);
    if entries.is_empty() {
        println!("Catalog is empty");
        return Ok(());
    }
    println!("{:<10} {:<24} {:<24} {}", "Section", "Id", "Label", "Detail");
    for entry in entries {
        println!(
            "{:<10} {:<24} {:<24} {}",
            entry.section, entry.id, entry.label, entry.detail
        );
    }
    Ok(())
}
