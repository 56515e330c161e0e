use branchfile_cli::{command, init_tracing, run, Invocation};

fn main() {
    let matches = command().get_matches();

    let invocation = match Invocation::from_matches(&matches) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    };
    init_tracing(invocation.verbose);

    let stdout = std::io::stdout();
    if let Err(e) = run(&invocation, &mut stdout.lock()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
