use crate::cli::commands::GradeArgs;
use crate::errors::GradewatchError;
use crate::models::letter_to_scale;
use crate::reporting::formatter::format_grade_scale;

pub async fn handle_grade(args: GradeArgs) -> Result<(), GradewatchError> {
    for letter in &args.letters {
        let scale = letter_to_scale(letter)?;
        println!("{}", format_grade_scale(letter, scale));
    }
    Ok(())
}
