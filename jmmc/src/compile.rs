use anyhow::{Context, Result};
use clap::Parser;

use ir::ClassUnit;
use jasmin::JasminGenerator;

#[derive(Debug, Parser)]
pub struct Args {
    /// Register budget for slot allocation; negative disables the allocator
    #[clap(short, long, default_value_t = -1, allow_hyphen_values = true)]
    pub register_allocation: i32,
    #[clap(short, long)]
    pub output: Option<String>,
    #[clap(short, long)]
    pub verbose: bool,
    #[clap(long)]
    pub debug: bool,
    pub source: String,
}

fn parse_file(path: &str) -> Result<ClassUnit> {
    let src = std::fs::read_to_string(path).context(format!("failed to open file: {}", path))?;

    parser::parse(&src).map_err(|err| {
        use ariadne::{ColorGenerator, Fmt, Label, Report, ReportKind, Source};

        let mut colors = ColorGenerator::new();
        let a = colors.next();

        let printed = Report::build(ReportKind::Error, path, err.loc.0)
            .with_code(3)
            .with_message(err.item.to_string())
            .with_label(
                Label::new((path, err.into()))
                    .with_message(format!("error found {}", "here".fg(a)))
                    .with_color(a),
            )
            .finish()
            .print((path, Source::from(src)));
        if let Err(e) = printed {
            log::error!("failed to print the report: {e}");
        }

        anyhow::Error::msg("aborting due to the error above")
    })
}

fn print_var_tables(unit: &ClassUnit) {
    for m in &unit.methods {
        let mut vars: Vec<_> = m.var_table.iter().collect();
        vars.sort_by_key(|(x, d)| (d.slot, x.to_string()));

        println!("{}:", m.name);
        for (x, d) in vars {
            println!("\t{x}: {} ({:?})", d.slot, d.scope);
        }
    }
}

pub fn compile(args: Args) -> Result<()> {
    let mut unit = parse_file(&args.source)?;

    if args.verbose {
        println!("[[ollir]]\n{}", unit);
    }

    let reports = jasmin::allocate(&mut unit, args.register_allocation);

    if args.verbose && args.register_allocation >= 0 {
        println!("[[allocated]]");
        print_var_tables(&unit);
        for r in &reports {
            println!("{r}");
        }
    }

    let mut gen = JasminGenerator::new(&unit);
    let code = gen
        .build()
        .context(format!("failed to generate code for {}", args.source))?;

    match &args.output {
        Some(path) => std::fs::write(path, code).context(format!("failed to write file: {}", path))?,
        None => print!("{}", code),
    }

    Ok(())
}
