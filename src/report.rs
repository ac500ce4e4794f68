use polytrace::TraceError;

pub fn report_error(err: &TraceError) {
    match err {
        TraceError::InvalidConfiguration { field, reason } => {
            eprintln!("Invalid option `{field}`: {reason}");
            eprintln!();
            eprintln!("Defaults: --max-colors 16, --color-tolerance 30, --simplify-tolerance 1.0");
            eprintln!("Run with --help to see every option and its environment variable.");
        }
        TraceError::ImageLoad(inner) => {
            eprintln!("Could not load the input image: {inner}");
        }
        _ => {
            eprintln!("{err}");
        }
    }
}
