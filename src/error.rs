/*!

Errors produced while building a run from its configuration.

Programmer errors, such as asking the port distributor to spread fewer ports than routers, are not represented here; they panic.

*/

use std::fmt::{self,Display,Formatter};
use std::path::PathBuf;

use crate::config_parser::ConfigurationValue;

///Where in the source code an error was generated.
#[derive(Debug,Clone,PartialEq)]
pub struct SourceLocation
{
	pub file: &'static str,
	pub line: u32,
	pub column: u32,
}

impl Display for SourceLocation
{
	fn fmt(&self, f:&mut Formatter) -> fmt::Result
	{
		write!(f,"{}:{}:{}",self.file,self.line,self.column)
	}
}

///The kinds of errors. Build them with the `error!` macro.
#[derive(Debug)]
pub enum ErrorKind
{
	///The configuration does not have the expected shape or its values are not acceptable.
	IllFormedConfiguration(ConfigurationValue),
	///Some argument given to a function or from the command line is invalid.
	BadArgument(String),
	CouldNotOpenFile(PathBuf,std::io::Error),
	///The text could not be parsed as a configuration. Contains the parser complaint.
	CouldNotParseFile(String),
	Undetermined,
}

#[derive(Debug)]
pub struct Error
{
	pub source_location: SourceLocation,
	pub kind: ErrorKind,
	pub message: Option<String>,
}

impl Error
{
	pub fn new(source_location:SourceLocation, kind:ErrorKind) -> Error
	{
		Error{ source_location, kind, message:None }
	}
	///Append a message to the error. Messages added later are printed after the previous ones.
	pub fn with_message(mut self, new_message:String) -> Error
	{
		self.message = match self.message
		{
			Some(old) => Some(format!("{}\n{}",old,new_message)),
			None => Some(new_message),
		};
		self
	}
	pub fn ill_formed_configuration(source_location:SourceLocation, value:ConfigurationValue) -> Error
	{
		Error::new(source_location,ErrorKind::IllFormedConfiguration(value))
	}
	pub fn bad_argument(source_location:SourceLocation, argument:String) -> Error
	{
		Error::new(source_location,ErrorKind::BadArgument(argument))
	}
	pub fn could_not_open_file(source_location:SourceLocation, path:PathBuf, error:std::io::Error) -> Error
	{
		Error::new(source_location,ErrorKind::CouldNotOpenFile(path,error))
	}
	pub fn could_not_parse_file(source_location:SourceLocation, complaint:String) -> Error
	{
		Error::new(source_location,ErrorKind::CouldNotParseFile(complaint))
	}
	pub fn undetermined(source_location:SourceLocation) -> Error
	{
		Error::new(source_location,ErrorKind::Undetermined)
	}
}

impl Display for ErrorKind
{
	fn fmt(&self, f:&mut Formatter) -> fmt::Result
	{
		use ErrorKind::*;
		match self
		{
			IllFormedConfiguration(value) => write!(f,"IllFormedConfiguration: the value {} is not valid here.",value.format_terminal()),
			BadArgument(argument) => write!(f,"BadArgument: {}",argument),
			CouldNotOpenFile(path,error) => write!(f,"CouldNotOpenFile: could not open {:?}: {}",path,error),
			CouldNotParseFile(complaint) => write!(f,"CouldNotParseFile: {}",complaint),
			Undetermined => write!(f,"Undetermined error"),
		}
	}
}

impl Display for Error
{
	fn fmt(&self, f:&mut Formatter) -> fmt::Result
	{
		writeln!(f,"Error at {}",self.source_location)?;
		write!(f,"{}",self.kind)?;
		if let Some(message) = &self.message
		{
			write!(f,"\n{}",message)?;
		}
		Ok(())
	}
}

impl std::error::Error for Error
{
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
	{
		match &self.kind
		{
			ErrorKind::CouldNotOpenFile(_,error) => Some(error),
			_ => None,
		}
	}
}

///The location in the source where it is called.
#[macro_export]
macro_rules! source_location{
	() => {
		$crate::error::SourceLocation{
			file: file!(),
			line: line!(),
			column: column!(),
		}
	}
}

///Build an `Error` of the given kind recording the place of the call.
///`error!(bad_argument,"text".to_string())` calls `Error::bad_argument(source_location!(),"text".to_string())`.
#[macro_export]
macro_rules! error{
	($kind:ident) => {
		$crate::error::Error::$kind( $crate::source_location!() )
	};
	($kind:ident, $($args:expr),* ) => {
		$crate::error::Error::$kind( $crate::source_location!(), $($args),* )
	};
}

#[cfg(test)]
mod tests {
	#[test]
	fn messages_accumulate()
	{
		let error = error!(bad_argument,"population_size=3".to_string())
			.with_message("population size must be even".to_string())
			.with_message("while building the evolution".to_string());
		let text = format!("{}",error);
		assert!(text.contains("population_size=3"));
		let first = text.find("population size must be even").expect("missing first message");
		let second = text.find("while building the evolution").expect("missing second message");
		assert!(first < second);
		assert!(text.contains("error.rs"));
	}
}
