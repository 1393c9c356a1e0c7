use std::env;
use std::process::ExitCode;

use recipe_distill::RecipePipeline;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(url) = args.get(1) else {
        eprintln!("usage: recipe-distill <url>");
        return ExitCode::FAILURE;
    };

    let pipeline = RecipePipeline::new();
    match pipeline.extract_recipe(url).await {
        Ok(recipe) => {
            match serde_json::to_string_pretty(&recipe) {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    eprintln!("failed to serialize recipe: {err}");
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
