use std::{path::Path, process};

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use ecoplug::{
    config::Config,
    discovery,
    error::Result,
    probe, reachability, reconcile,
    registry::Registry,
};

const NOT_FOUND: &str = "No device with the given address or alias was found.";

fn main() {
    env_logger::init();

    let matches = App::new("ecoplug")
        .version("0.3.0")
        .about("Discover TPLink smart plugs on the local network and power them on or off based on internet reachability.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("discover")
                .long("discover")
                .takes_value(true)
                .possible_values(&["targets", "sweep", "broadcast"])
                .default_value("targets")
                .help("How to find devices: resolve the configured targets, sweep the local subnet, or broadcast to the whole LAN."),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .takes_value(true)
                .default_value("config.json")
                .help("Path to the target list."),
        )
        .subcommand(
            SubCommand::with_name("turn_on")
                .about("Turn the target device on if it is off")
                .arg(target_arg()),
        )
        .subcommand(
            SubCommand::with_name("turn_off")
                .about("Turn the target device off if it is on")
                .arg(target_arg()),
        )
        .subcommand(SubCommand::with_name("list").about("List discovered devices in a table"))
        .subcommand(
            SubCommand::with_name("set_alias")
                .about("Set the alias of the target device")
                .arg(target_arg())
                .arg(
                    Arg::with_name("new_alias")
                        .required(true)
                        .help("The new alias to set."),
                ),
        )
        .subcommand(
            SubCommand::with_name("update")
                .about("Power every device on or off based on internet reachability"),
        )
        .subcommand(
            SubCommand::with_name("update_one")
                .about("Power the target device on or off based on internet reachability")
                .arg(target_arg()),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("{}", err);
        process::exit(1);
    }
}

fn target_arg() -> Arg<'static, 'static> {
    Arg::with_name("target")
        .required(true)
        .help("The target smart device. Can be either the device's IP or its alias.")
}

fn run(matches: &ArgMatches) -> Result<()> {
    let mut registry = build_registry(matches)?;

    match matches.subcommand() {
        ("turn_on", Some(sub)) => command_turn_on(&mut registry, sub.value_of("target").unwrap()),
        ("turn_off", Some(sub)) => command_turn_off(&mut registry, sub.value_of("target").unwrap()),
        ("list", _) => {
            command_list(&registry);
            Ok(())
        }
        ("set_alias", Some(sub)) => command_set_alias(
            &mut registry,
            sub.value_of("target").unwrap(),
            sub.value_of("new_alias").unwrap(),
        ),
        ("update", _) => {
            reconcile::reconcile_fleet(&mut registry, reachability::has_internet());
            Ok(())
        }
        ("update_one", Some(sub)) => {
            command_update_one(&mut registry, sub.value_of("target").unwrap())
        }
        _ => Ok(()),
    }
}

fn build_registry(matches: &ArgMatches) -> Result<Registry> {
    match matches.value_of("discover").unwrap() {
        "sweep" => Ok(discovery::resolve(&probe::scan()?)),
        "broadcast" => discovery::discover(),
        _ => {
            let path = Path::new(matches.value_of("config").unwrap());
            match Config::load(path)? {
                Some(config) => Ok(discovery::resolve_targets(config.targets())),
                None => {
                    println!("No target list found; wrote a template to {}.", path.display());
                    println!("Edit it with your device IPs and/or aliases and rerun.");
                    process::exit(0);
                }
            }
        }
    }
}

fn command_turn_on(registry: &mut Registry, target: &str) -> Result<()> {
    match registry.find_mut(target) {
        None => println!("{}", NOT_FOUND),
        Some(plug) => {
            if reconcile::turn_on_if_off(plug)? {
                println!("{} has been turned on.", plug.alias());
            } else {
                println!("{} is already on.", plug.alias());
            }
        }
    }
    Ok(())
}

fn command_turn_off(registry: &mut Registry, target: &str) -> Result<()> {
    match registry.find_mut(target) {
        None => println!("{}", NOT_FOUND),
        Some(plug) => {
            if reconcile::turn_off_if_on(plug)? {
                println!("{} has been turned off.", plug.alias());
            } else {
                println!("{} is already off.", plug.alias());
            }
        }
    }
    Ok(())
}

fn command_list(registry: &Registry) {
    println!("{}{}{}", pad("IP", 17), pad("Alias", 20), "Is on?");
    for plug in registry.iter() {
        println!(
            "{}{}{}",
            pad(&plug.addr().to_string(), 17),
            pad(plug.alias(), 20),
            plug.is_on(),
        );
    }
}

fn pad(value: &str, padding: usize) -> String {
    let pad = " ".repeat(padding.saturating_sub(value.len()));
    format!("{}{}", value, pad)
}

fn command_set_alias(registry: &mut Registry, target: &str, new_alias: &str) -> Result<()> {
    match registry.find_mut(target) {
        None => println!("{}", NOT_FOUND),
        Some(plug) => {
            plug.set_alias(new_alias)?;
            println!("{} is now known as {}.", plug.addr(), new_alias);
        }
    }
    Ok(())
}

fn command_update_one(registry: &mut Registry, target: &str) -> Result<()> {
    match registry.find_mut(target) {
        None => println!("{}", NOT_FOUND),
        Some(plug) => {
            let desired_on = reachability::has_internet();
            if reconcile::reconcile(plug, desired_on)? {
                println!(
                    "{} has been turned {}.",
                    plug.alias(),
                    if desired_on { "on" } else { "off" }
                );
            }
        }
    }
    Ok(())
}
