// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn range_args() -> [Arg; 3] {
    [
        Arg::new("period")
            .long("period")
            .short('p')
            .value_parser(["day", "week", "month", "year", "custom"])
            .help("Preset period relative to today (default: month)"),
        Arg::new("from")
            .long("from")
            .help("Range start YYYY-MM-DD (implies --period custom)"),
        Arg::new("to")
            .long("to")
            .help("Range end YYYY-MM-DD (default: today)"),
    ]
}

fn type_arg() -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .value_parser(["income", "expense", "transfer"])
}

pub fn build_cli() -> Command {
    Command::new("fintrend")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Personal finance ledger: accounts, categories, trends and goals")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging (RUST_LOG takes precedence)"),
        )
        .subcommand(Command::new("init").about("Create the ledger database"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("checking")
                                .help("checking|savings|investment|credit_card|cash|other"),
                        )
                        .arg(
                            Arg::new("opening")
                                .long("opening")
                                .allow_negative_numbers(true)
                                .default_value("0")
                                .help("Opening balance"),
                        )
                        .arg(Arg::new("color").long("color"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .default_value("0")
                                .help("Credit limit (credit cards)"),
                        ),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage income/expense categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .default_value("expense")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(
                    Command::new("seed").about("Add the default income and expense categories"),
                )
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .value_parser(["income", "expense"]),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .value_parser(["income", "expense"]),
                        ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)"))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(type_arg().default_value("expense"))
                        .arg(Arg::new("description").long("description").short('d').required(true))
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(
                            Arg::new("unpaid")
                                .long("unpaid")
                                .action(ArgAction::SetTrue)
                                .help("Record as not yet settled"),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("list")
                        .args(range_args())
                        .arg(type_arg())
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .short('s')
                                .help("Case-insensitive text to match in the description"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("settle")
                        .about("Mark a transaction as paid (or unpaid with --undo)")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("undo").long("undo").action(ArgAction::SetTrue)),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries, trends and category breakdowns")
                .subcommand(Command::new("summary").args(range_args()).args(json_args()))
                .subcommand(
                    Command::new("trend")
                        .args(range_args())
                        .arg(
                            Arg::new("interval")
                                .long("interval")
                                .short('i')
                                .value_parser(["day", "week", "month"])
                                .help("Bucket size (default depends on --period)"),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("categories")
                        .args(range_args())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .default_value("expense")
                                .value_parser(["income", "expense"]),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("monthly")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .default_value("6")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("as-of")
                                .long("as-of")
                                .help("Reference date YYYY-MM-DD (default: today)"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("end").long("end").required(true).help("YYYY-MM-DD")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("contribute")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write transactions or trend buckets to a file")
                .subcommand(
                    Command::new("transactions")
                        .args(range_args())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .value_parser(["csv", "json"]),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("trend")
                        .args(range_args())
                        .arg(
                            Arg::new("interval")
                                .long("interval")
                                .short('i')
                                .value_parser(["day", "week", "month"]),
                        )
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .value_parser(["csv", "json"]),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-currency").arg(Arg::new("currency").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the ledger for inconsistencies"))
}
