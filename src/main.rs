use cultivar::cli::run;
use cultivar::error::EngineError;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        let internal = matches!(
            e.downcast_ref::<EngineError>(),
            Some(EngineError::StorePermanent(_)) | Some(EngineError::InternalInvariant(_))
        );

        if internal {
            eprintln!("Internal error: {}", e);
        } else {
            eprintln!("Error: {}", e);
        }

        let mut source = e.source();
        if source.is_some() {
            eprintln!("\nCaused by:");
            let mut indent = 1;
            while let Some(err) = source {
                eprintln!("{:indent$}  {}", "", err);
                source = err.source();
                indent += 1;
            }
        }

        std::process::exit(if internal { 2 } else { 1 });
    }
}
