use crate::{
    models::students::{Student, StudentInput},
    AppState,
};

pub async fn get_all_students(state: &AppState) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>("SELECT * FROM students ORDER BY last_name, first_name")
        .fetch_all(&state.db_pool)
        .await
}

pub async fn create_student(state: &AppState, input: StudentInput) -> Result<i64, sqlx::Error> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO students (first_name, last_name, email, course) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(input.first_name.trim())
    .bind(input.last_name.trim())
    .bind(input.email)
    .bind(input.course)
    .fetch_one(&state.db_pool)
    .await?;
    log::info!("Student {} added", id);
    Ok(id)
}
