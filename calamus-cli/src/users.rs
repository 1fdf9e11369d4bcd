use clap::{App, Arg, ArgMatches, SubCommand};

use calamus_models::{
    users::{NewUser, User},
    Connection,
};

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("users").about("Manage users").subcommand(
        SubCommand::with_name("new")
            .arg(
                Arg::with_name("name")
                    .short("n")
                    .long("name")
                    .alias("username")
                    .takes_value(true)
                    .help("The username of the new user"),
            )
            .arg(
                Arg::with_name("display-name")
                    .short("N")
                    .long("display-name")
                    .takes_value(true)
                    .help("The display name of the new user"),
            )
            .arg(
                Arg::with_name("biography")
                    .short("b")
                    .long("bio")
                    .alias("biography")
                    .takes_value(true)
                    .help("The biography of the new user"),
            )
            .arg(
                Arg::with_name("email")
                    .short("e")
                    .long("email")
                    .takes_value(true)
                    .help("Email address of the new user"),
            )
            .about("Create a new user on this instance"),
    )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        _ => println!("Unknown subcommand"),
    }
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let username = args
        .value_of("name")
        .map(String::from)
        .unwrap_or_else(|| super::ask_for("Username"));
    let display_name = args
        .value_of("display-name")
        .map(String::from)
        .unwrap_or_else(|| username.clone());
    let bio = args.value_of("biography").unwrap_or("").to_string();
    let email = args.value_of("email").map(String::from);

    let user = User::insert(
        conn,
        NewUser {
            username,
            display_name,
            email,
            bio,
        },
    )
    .expect("Couldn't save the new user");
    println!("Created user {} (id {})", user.username, user.id);
}
