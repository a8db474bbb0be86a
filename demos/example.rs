use mini_ini::{section_data, Document};

#[derive(Debug, Default)]
struct ServerSection {
    host: String,
    port: u16,
    workers: u32,
    tags: Option<Vec<String>>,
}

section_data!(ServerSection {
    host,
    port,
    workers,
    tags
});

fn main() -> Result<(), mini_ini::ConfigError> {
    let document = Document::load("demos/server.ini")?;

    println!(
        "App: {} (debug={})",
        document.string("name", "unnamed"),
        document.boolean("debug", false)
    );

    // Fields missing from the file keep their defaults.
    let mut server = ServerSection {
        workers: 4,
        ..ServerSection::default()
    };
    if document.data_from_section("server", &mut server) {
        println!("Server: {server:?}");
    }

    println!(
        "Database: {} (pool={})",
        document.string_from_section("database", "url", "sqlite::memory:"),
        document.integer_from_section("database", "pool", 1)
    );

    Ok(())
}
