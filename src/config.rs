
use crate::config_parser::{self,ConfigurationValue};
use crate::error;
use crate::error::*;

///Lines written by `format_terminal` are kept below this width when possible.
const TERMINAL_WIDTH: usize = 100;

///Every way of picking one element of each factor, with the last factor varying fastest.
///An empty factor leaves no way at all.
fn cartesian_product<T:Clone>(factors:Vec<Vec<T>>) -> Vec<Vec<T>>
{
	factors.into_iter().fold(vec![vec![]],|partial,factor|{
		partial.iter().flat_map(|prefix|factor.iter().map(move |element|{
			let mut extended = prefix.clone();
			extended.push(element.clone());
			extended
		})).collect()
	})
}

///The runs a value stands for once flattened.
fn alternatives(value:&ConfigurationValue) -> Vec<ConfigurationValue>
{
	match flatten_configuration_value(value)
	{
		ConfigurationValue::Experiments(list) => list,
		flat => vec![flat],
	}
}

///Expands all the inner ConfigurationValue::Experiments given out a single ConfigurationValue::Experiments
///whose elements are free of them.
pub fn flatten_configuration_value(value:&ConfigurationValue) -> ConfigurationValue
{
	use ConfigurationValue::*;
	match value
	{
		Object(name,fields) =>
		{
			let factors : Vec<Vec<(String,ConfigurationValue)>> = fields.iter().map(|(key,field)|
				alternatives(field).into_iter().map(|alternative|(key.clone(),alternative)).collect()
			).collect();
			Experiments(cartesian_product(factors).into_iter().map(|fields|Object(name.clone(),fields)).collect())
		},
		Array(list) => Experiments(cartesian_product(list.iter().map(alternatives).collect()).into_iter().map(Array).collect()),
		Experiments(list) => Experiments(list.iter().flat_map(alternatives).collect()),
		_ => value.clone(),
	}
}

///Tries to access to a given path inside a ConfigurationValue. The path is a list of field names.
///The last field is created if the object exists but lacks it.
///Returns `None` if the path is not found.
pub fn config_mut_into<'a>(value:&'a mut ConfigurationValue, path:&[&str]) -> Option<&'a mut ConfigurationValue>
{
	let (first,rest) = match path.split_first()
	{
		Some(split) => split,
		None => return Some(value),
	};
	match value
	{
		ConfigurationValue::Object(ref _object_name,ref mut arr) =>
		{
			let position = match arr.iter().position(|(key,_)|key==first)
			{
				Some(position) => position,
				None if rest.is_empty() =>
				{
					arr.push((first.to_string(),ConfigurationValue::None));
					arr.len()-1
				},
				None => return None,
			};
			config_mut_into(&mut arr[position].1,rest)
		}
		_ => None,
	}
}

/**
Apply a free argument of the form `path=value` to a configuration. For example `traffic.amount=300`.
**/
pub fn rewrite_free_argument(value:&mut ConfigurationValue, argument:&str) -> Result<(),Error>
{
	let (left,right) = match argument.split_once('=')
	{
		Some(split) => split,
		None => return Err(error!(bad_argument,argument.to_string()).with_message("free arguments must have the form path=value".to_string())),
	};
	let new_value = config_parser::parse(right).map_err(|e|e.with_message(format!("while parsing the free argument {}",argument)))?;
	let path : Vec<&str> = left.trim().split('.').collect();
	match config_mut_into(value,&path)
	{
		Some(ptr) =>
		{
			*ptr = new_value;
			Ok(())
		},
		None => Err(error!(bad_argument,argument.to_string()).with_message(format!("the path {} does not exist in the configuration",left))),
	}
}

/// match arms against the keys of an object
/// first argument, `$cv:expr`, is the ConfigurationValue expected to be the object
/// second argument, `$name:literal`, is the name the Object should have.
/// third argument, `$valueid:ident`, is the variable name capturing the value in the object's elements
///    and can be used in the arms
/// the remaining arguments are the arms of the match.
#[macro_export]
macro_rules! match_object{
	($cv:expr, $name:literal, $valueid:ident, $($arm:tt)* ) => {{
		$crate::match_object!($cv,[$name],$valueid,$($arm)*)
	}};
	($cv:expr, $names:expr, $valueid:ident, $($arm:tt)* ) => {{
		if let &ConfigurationValue::Object(ref cv_name, ref cv_pairs) = $cv
		{
			if !$names.iter().any(|&x|x==cv_name)
			{
				return Err($crate::error!(ill_formed_configuration,$cv.clone()).with_message(format!("A {} must be created from a `{}` object not `{}`",$names[0],$names[0],cv_name)));
			}
			for &(ref name,ref $valueid) in cv_pairs
			{
				match AsRef::<str>::as_ref(&name)
				{
					$( $arm )*
					"legend_name" => (),
					_ => return Err($crate::error!(ill_formed_configuration,$cv.clone()).with_message(format!("Nothing to do with field {} in {}",name,$names.get(0).unwrap_or_else(||&"None")))),
				}
			}
		}
		else
		{
			return Err($crate::error!(ill_formed_configuration,$cv.clone()).with_message(format!("Trying to create a {} from a non-Object",$names.get(0).unwrap_or_else(||&"None"))));
		}
	}};
}
impl ConfigurationValue
{
	pub fn as_bool(&self) -> Result<bool,Error>
	{
		match self
		{
			&ConfigurationValue::True => Ok(true),
			&ConfigurationValue::False => Ok(false),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_str(&self) -> Result<&str,Error>
	{
		match self
		{
			&ConfigurationValue::Literal(ref s) => Ok(s),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_f64(&self) -> Result<f64,Error>
	{
		match self
		{
			&ConfigurationValue::Number(x) => Ok(x),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_usize(&self) -> Result<usize,Error>
	{
		match self
		{
			&ConfigurationValue::Number(x) =>{
				if x < 0.0 {
					return Err(error!(ill_formed_configuration, self.clone()).with_message("expected a non-negative integer".to_string()));
				}
				let res =  x as usize;
				// Casting from a float to an integer will round the float towards zero
				// overflows and underflows will saturate
				let y = res as f64;
				let tolerance = 1e-5;
				if x-y > tolerance || x-y < -tolerance {
					Err(error!(ill_formed_configuration, self.clone()))
				} else {
					Ok( res )
				}
			},
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	pub fn as_u64(&self) -> Result<u64,Error>
	{
		self.as_usize().map(|x|x as u64)
	}
	pub fn as_array(&self) -> Result<&Vec<ConfigurationValue>,Error>
	{
		match self
		{
			&ConfigurationValue::Array(ref x) => Ok(x),
			_ => Err(error!(ill_formed_configuration, self.clone() )),
		}
	}
	/// Build a generic IllFormedConfiguration error from this ConfigurationValue.
	pub fn ill(&self,message:&str) -> Error
	{
		error!(ill_formed_configuration,self.clone()).with_message(message.to_string())
	}
	///Write the value in the configuration language, so that it can be parsed back.
	pub fn format_terminal(&self) -> String
	{
		self.format_nesting(0)
	}
	///A single line if it fits in `TERMINAL_WIDTH`, otherwise an element per line indented by `nesting+1` tabs.
	fn format_nesting(&self, nesting:usize) -> String
	{
		use ConfigurationValue::*;
		let (open,close,elements) : (String,&str,Vec<String>) = match self
		{
			Object(name,fields) if fields.is_empty() => return name.clone(),
			Object(name,fields) => (format!("{}{{",name),"}",fields.iter().map(|(key,value)|format!("{}: {}",key,value.format_nesting(nesting+1))).collect()),
			Array(list) => ("[".to_string(),"]",list.iter().map(|value|value.format_nesting(nesting+1)).collect()),
			Experiments(list) => ("![".to_string(),"]",list.iter().map(|value|value.format_nesting(nesting+1)).collect()),
			Literal(s) => return format!("\"{}\"",s),
			//Non-finite values give `inf`, `-inf` and `NaN`, which the parser accepts.
			Number(x) => return format!("{}",x),
			True => return "true".to_string(),
			False => return "false".to_string(),
			None => return "None".to_string(),
		};
		if elements.is_empty()
		{
			return format!("{}{}",open,close);
		}
		let line = format!("{} {} {}",open,elements.join(", "),close);
		if line.len() <= TERMINAL_WIDTH && !line.contains('\n')
		{
			return line;
		}
		let indentation = "\t".repeat(nesting+1);
		format!("{}\n{}{}\n{}{}",open,indentation,elements.join(&format!(",\n{}",indentation)),"\t".repeat(nesting),close)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	#[test]
	fn flatten_test_simple()
	{
		use ConfigurationValue::*;
		let original = Object("Alpha".to_string(),vec![("a".to_string(),
			Experiments(vec![Number(1.0),Number(2.0)]),
		)]);
		let target = Experiments(vec![
			Object("Alpha".to_string(),vec![("a".to_string(),Number(1.0))]),
			Object("Alpha".to_string(),vec![("a".to_string(),Number(2.0))]),
		]);
		assert_eq!(flatten_configuration_value(&original),target);
	}
	#[test]
	fn flatten_test_product()
	{
		use ConfigurationValue::*;
		/*
		Alpha{a:![1,2], b:Beta{c:![3,4]}}
		*/
		let original = Object("Alpha".to_string(),vec![
			("a".to_string(),Experiments(vec![Number(1.0),Number(2.0)])),
			("b".to_string(),Object("Beta".to_string(),vec![("c".to_string(),Experiments(vec![Number(3.0),Number(4.0)]))])),
		]);
		match flatten_configuration_value(&original)
		{
			Experiments(list) =>
			{
				assert_eq!(list.len(),4);
				let expected = Object("Alpha".to_string(),vec![
					("a".to_string(),Number(2.0)),
					("b".to_string(),Object("Beta".to_string(),vec![("c".to_string(),Number(3.0))])),
				]);
				assert_eq!(list[2],expected);
			},
			x => panic!("expected experiments, got {:?}",x),
		}
	}
	#[test]
	fn free_arguments_rewrite_paths()
	{
		let mut value = config_parser::parse("Configuration{ hosts:12, traffic: Traffic{amount:10} }").expect("parse");
		rewrite_free_argument(&mut value,"hosts=24").expect("rewrite top");
		rewrite_free_argument(&mut value,"traffic.amount=300").expect("rewrite nested");
		rewrite_free_argument(&mut value,"maximum_ports=8").expect("create field");
		let target = config_parser::parse("Configuration{ hosts:24, traffic: Traffic{amount:300}, maximum_ports:8 }").expect("parse");
		assert_eq!(value,target);
		assert!(rewrite_free_argument(&mut value,"hosts").is_err());
		assert!(rewrite_free_argument(&mut value,"missing.field=1").is_err());
	}
	#[test]
	fn flatten_experiments_inside_arrays()
	{
		use ConfigurationValue::*;
		let original = Array(vec![Experiments(vec![Number(1.0),Number(2.0)]),Number(3.0)]);
		let target = Experiments(vec![
			Array(vec![Number(1.0),Number(3.0)]),
			Array(vec![Number(2.0),Number(3.0)]),
		]);
		assert_eq!(flatten_configuration_value(&original),target);
		let nested = Experiments(vec![Number(0.0),Experiments(vec![Number(1.0),Number(2.0)])]);
		assert_eq!(flatten_configuration_value(&nested),Experiments(vec![Number(0.0),Number(1.0),Number(2.0)]));
		let empty = Object("Alpha".to_string(),vec![("a".to_string(),Experiments(vec![]))]);
		assert_eq!(flatten_configuration_value(&empty),Experiments(vec![]));
	}
	#[test]
	fn terminal_format_breaks_long_values()
	{
		use ConfigurationValue::*;
		let short = Object("Result".to_string(),vec![("generations".to_string(),Number(4.0)),("types".to_string(),Array(vec![]))]);
		assert_eq!(short.format_terminal(),"Result{ generations: 4, types: [] }");
		let long = Object("Result".to_string(),vec![
			("membership_table".to_string(),Array((0..60).map(|x|Number(x as f64)).collect())),
			("fitness".to_string(),Object("TrafficDifference".to_string(),vec![])),
			("name".to_string(),Literal("sixty hosts".to_string())),
		]);
		let text = long.format_terminal();
		assert!(text.starts_with("Result{\n\tmembership_table: ["),"got {}",text);
		assert!(text.lines().all(|line|line.len()<=TERMINAL_WIDTH+4),"got {}",text);
		assert_eq!(config_parser::parse(&text).expect("should parse"),long);
	}
	#[test]
	fn integer_accessor_rejects_fractions()
	{
		assert_eq!(ConfigurationValue::Number(7.0).as_usize().expect("integer"),7);
		assert!(ConfigurationValue::Number(7.5).as_usize().is_err());
		assert!(ConfigurationValue::Number(-1.0).as_usize().is_err());
		assert!(ConfigurationValue::True.as_usize().is_err());
		assert_eq!(ConfigurationValue::True.as_bool().expect("boolean"),true);
		assert!(ConfigurationValue::Number(1.0).as_bool().is_err());
		assert_eq!(ConfigurationValue::Literal("hub".to_string()).as_str().expect("literal"),"hub");
		assert_eq!(ConfigurationValue::Array(vec![ConfigurationValue::False]).as_array().expect("array").len(),1);
	}
}
