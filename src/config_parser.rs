/*!

The configuration language.

A configuration is a tree of [ConfigurationValue]. The text form is

```ignore
Configuration
{
	hosts: 12,//a number
	fitness: TrafficDifference,//an object without fields
	traffic: Traffic { non_zero_chance: 0.5, amount: 4500, offset: 500 },
	population_size: ![10, 20],//a list of experiments
	name: "twelve hosts",//a literal
	elitism_enabled: true,
	ports: [1,2,3],//an array
}
```

Line comments `//` and block comments `/* */` are skipped. Non-finite numbers are written `inf`, `-inf` and `NaN`.

The grammar is in `config.pest` and the parser is generated with `pest_derive`.

*/

use pest::Parser;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::error::Error;
use crate::error;

#[derive(Debug,Clone,PartialEq)]
pub enum ConfigurationValue
{
	Literal(String),
	Number(f64),
	Object(String,Vec<(String,ConfigurationValue)>),
	Array(Vec<ConfigurationValue>),
	///Each of the values is a different run.
	Experiments(Vec<ConfigurationValue>),
	True,
	False,
	None,
}

#[derive(Parser)]
#[grammar = "config.pest"]
struct ConfigurationParser;

///Parse a whole text into a single value.
pub fn parse(text:&str) -> Result<ConfigurationValue,Error>
{
	let mut pairs = ConfigurationParser::parse(Rule::file,text).map_err(|e|{
		let (line,column) = match e.line_col
		{
			LineColLocation::Pos(position) => position,
			LineColLocation::Span(start,_) => start,
		};
		error!(could_not_parse_file,format!("{} at line {} column {}",e.variant.message(),line,column))
	})?;
	//`file` holds the value followed by EOI.
	match pairs.next().and_then(|file|file.into_inner().next())
	{
		Some(value) => build_value(value),
		None => Err(error!(could_not_parse_file,"there is no value".to_string())),
	}
}

fn complaint(pair:&Pair<Rule>, what:String) -> Error
{
	let (line,column) = pair.as_span().start_pos().line_col();
	error!(could_not_parse_file,format!("{} at line {} column {}",what,line,column))
}

fn build_value(pair:Pair<Rule>) -> Result<ConfigurationValue,Error>
{
	match pair.as_rule()
	{
		Rule::number => match pair.as_str().parse::<f64>()
		{
			Ok(x) => Ok(ConfigurationValue::Number(x)),
			Err(_) => Err(complaint(&pair,format!("`{}` is not a number",pair.as_str()))),
		},
		Rule::boolean => Ok(if pair.as_str()=="true" { ConfigurationValue::True } else { ConfigurationValue::False }),
		Rule::literal =>
		{
			let content = pair.into_inner().next().map(|text|text.as_str()).unwrap_or("");
			Ok(ConfigurationValue::Literal(content.to_string()))
		},
		Rule::array => Ok(ConfigurationValue::Array(pair.into_inner().map(build_value).collect::<Result<_,_>>()?)),
		Rule::experiments => Ok(ConfigurationValue::Experiments(pair.into_inner().map(build_value).collect::<Result<_,_>>()?)),
		Rule::object =>
		{
			let mut inner = pair.into_inner();
			let name = match inner.next()
			{
				Some(identifier) => identifier.as_str().to_string(),
				None => return Err(error!(could_not_parse_file,"object without name".to_string())),
			};
			let mut fields = vec![];
			for field in inner
			{
				let mut key_value = field.into_inner();
				match (key_value.next(),key_value.next())
				{
					(Some(key),Some(value)) => fields.push((key.as_str().to_string(),build_value(value)?)),
					_ => return Err(error!(could_not_parse_file,format!("incomplete field in {}",name))),
				}
			}
			Ok(ConfigurationValue::Object(name,fields))
		},
		_ => Err(complaint(&pair,format!("unexpected {:?}",pair.as_rule()))),
	}
}
