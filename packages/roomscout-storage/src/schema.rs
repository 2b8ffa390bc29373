pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_chat_sessions.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_chat_sessions.sql")),
				"tables/002_chat_messages.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_chat_messages.sql")),
				"tables/003_properties.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_properties.sql")),
				"tables/004_property_images.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_property_images.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn schema_expands_every_include() {
		let sql = render_schema();

		assert!(!sql.contains("\\ir "), "unexpanded include in rendered schema");
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS chat_sessions"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS chat_messages"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS properties"));
		assert!(sql.contains("CREATE TABLE IF NOT EXISTS property_images"));
	}
}
