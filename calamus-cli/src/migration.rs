use clap::{App, ArgMatches, SubCommand};

use calamus_models::{migrations, Connection};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("migration")
        .about("Manage migrations")
        .subcommand(SubCommand::with_name("run").about("Run pending migrations"))
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("run", Some(_)) => migrations::run(conn).expect("Failed to run migrations"),
        ("", None) => command().print_help().unwrap(),
        _ => println!("Unknown subcommand"),
    }
}
