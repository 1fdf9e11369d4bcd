use clap::{App, Arg, ArgMatches, SubCommand};

use calamus_models::{
    forms::GroupForm,
    groups::{Group, NewGroup},
    Connection,
};
use validator::Validate;

pub fn command<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("groups")
        .about("Manage groups")
        .subcommand(
            SubCommand::with_name("new")
                .arg(
                    Arg::with_name("title")
                        .short("t")
                        .long("title")
                        .takes_value(true)
                        .help("The title of the new group"),
                )
                .arg(
                    Arg::with_name("slug")
                        .short("s")
                        .long("slug")
                        .takes_value(true)
                        .help("The URL slug of the new group (must be unique)"),
                )
                .arg(
                    Arg::with_name("description")
                        .short("d")
                        .long("description")
                        .takes_value(true)
                        .help("What this group is about"),
                )
                .about("Create a new group on this instance"),
        )
}

pub fn run<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    match args.subcommand() {
        ("new", Some(x)) => new(x, conn),
        _ => println!("Unknown subcommand"),
    }
}

fn new<'a>(args: &ArgMatches<'a>, conn: &Connection) {
    let form = GroupForm {
        title: args
            .value_of("title")
            .map(String::from)
            .unwrap_or_else(|| super::ask_for("Title")),
        slug: args
            .value_of("slug")
            .map(String::from)
            .unwrap_or_else(|| super::ask_for("Slug")),
        description: args.value_of("description").unwrap_or("").to_string(),
    };
    form.validate().expect("Invalid group");

    let group = Group::insert(
        conn,
        NewGroup {
            title: form.title,
            slug: form.slug,
            description: form.description,
        },
    )
    .expect("Couldn't save the new group");
    println!("Created group {} (/group/{}/)", group.title, group.slug);
}
