fn main() {
    commitviz::cli::init_tracing();
    if let Err(err) = commitviz::cli::run_calendar(std::env::args_os()) {
        commitviz::cli::report(&err);
        std::process::exit(1);
    }
}
