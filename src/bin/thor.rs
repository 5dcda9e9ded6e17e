use clap::Parser;
use spidey::thor::{self, Target};

#[derive(Debug, Parser)]
#[command(name = "thor")]
#[command(about = "Hammer a URL with concurrent HTTP requests")]
#[command(disable_help_flag = true)]
struct Args {
    /// Number of hammers to utilize
    #[arg(short = 'h', long, default_value_t = 1)]
    hammers: usize,

    /// Number of throws per hammer
    #[arg(short = 't', long, default_value_t = 1)]
    throws: usize,

    /// Display the body of every response
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,

    url: String,
}

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) if args.hammers > 0 && args.throws > 0 => args,
        Ok(_) => usage(),
        Err(e) if e.kind() == clap::error::ErrorKind::DisplayHelp => {
            let _ = e.print();
            std::process::exit(0);
        }
        Err(_) => usage(),
    };

    let target = match Target::parse(&args.url) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("thor: {e:#}");
            usage();
        }
    };

    let reports = match thor::run(target, args.hammers, args.throws).await {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("thor: {e:#}");
            std::process::exit(1);
        }
    };

    for report in &reports {
        for (i, throw) in report.throws.iter().enumerate() {
            if args.verbose {
                println!("{}", String::from_utf8_lossy(throw.body()));
            }
            println!(
                "Hammer: {}, Throw:\t{}, Elapsed Time: {:.2}",
                report.id,
                i,
                throw.elapsed.as_secs_f64()
            );
        }
        println!(
            "Hammer: {}, AVERAGE:\t, Elapsed Time: {:.2}",
            report.id,
            report.average().as_secs_f64()
        );
    }

    let total = thor::average(reports.iter().map(|r| r.average()));
    println!("TOTAL AVERAGE ELAPSED TIME: {:.2}", total.as_secs_f64());
}

fn usage() -> ! {
    eprintln!(
        "Usage: thor [-h HAMMERS -t THROWS] URL\n    \
         -h  HAMMERS     Number of hammers to utilize (1)\n    \
         -t  THROWS      Number of throws per hammer  (1)\n    \
         -v              Display verbose output"
    );
    std::process::exit(1);
}
