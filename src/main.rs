use std::env;

use env_logger::Env;

use topoga_lib::{terminal_main,Plugs};

fn main()
{
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
	let args: Vec<String> = env::args().collect();
	let plugs = Plugs::default();
	if let Err(error) = terminal_main(&args,&plugs)
	{
		eprintln!("{}",error);
		std::process::exit(-1);
	}
}
