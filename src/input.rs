/*!

The problem instance: how much hosts talk to each other, what the channels between routers can carry and how many ports each router has.

The instance is generated once at the start of a run and is read-only afterwards.

```ignore
Traffic{
	non_zero_chance: 0.5,//probability of a pair of hosts exchanging anything
	amount: 4500,//width of the range of volumes
	offset: 500,//lowest volume of a non-zero entry
}
Bandwidth{
	amount: 20000,
	offset: 3000,
}
```

*/

use std::fmt::{self,Display,Formatter};

use itertools::Itertools;
use log::debug;

use crate::config_parser::ConfigurationValue;
use crate::error::Error;
use crate::matrix::{Matrix,SymmetricalMatrix};
use crate::ports;
use crate::random::TopologyRandom;
use crate::{error,match_object};

///How to generate the traffic between hosts.
#[derive(Debug,Clone,PartialEq)]
pub struct TrafficOptions
{
	///Probability of an ordered pair of hosts having non-zero traffic.
	pub non_zero_chance: f64,
	///Non-zero volumes are drawn from `[offset,offset+amount)`.
	pub amount: usize,
	pub offset: usize,
}

impl TrafficOptions
{
	pub fn new(cv:&ConfigurationValue) -> Result<TrafficOptions,Error>
	{
		let mut non_zero_chance=None;
		let mut amount=None;
		let mut offset=0;
		match_object!(cv,"Traffic",value,
			"non_zero_chance" => non_zero_chance=Some(value.as_f64().map_err(|e|e.with_message("bad value for non_zero_chance".to_string()))?),
			"amount" => amount=Some(value.as_usize().map_err(|e|e.with_message("bad value for amount".to_string()))?),
			"offset" => offset=value.as_usize().map_err(|e|e.with_message("bad value for offset".to_string()))?,
		);
		let non_zero_chance=non_zero_chance.ok_or_else(||cv.ill("There were no non_zero_chance"))?;
		let amount=amount.ok_or_else(||cv.ill("There were no amount"))?;
		let options = TrafficOptions{non_zero_chance,amount,offset};
		options.validate()?;
		Ok(options)
	}
	pub fn validate(&self) -> Result<(),Error>
	{
		if !(0.0..=1.0).contains(&self.non_zero_chance)
		{
			return Err(error!(bad_argument,format!("non_zero_chance={}",self.non_zero_chance)).with_message("non_zero_chance must be in [0,1]".to_string()));
		}
		if self.amount==0
		{
			return Err(error!(bad_argument,"traffic amount=0".to_string()).with_message("the range of traffic volumes cannot be empty".to_string()));
		}
		Ok(())
	}
}

///How to generate the bandwidth of the channels between routers.
#[derive(Debug,Clone,PartialEq)]
pub struct BandwidthOptions
{
	///Bandwidths are drawn from `[offset,offset+amount)`.
	pub amount: usize,
	pub offset: usize,
}

impl BandwidthOptions
{
	pub fn new(cv:&ConfigurationValue) -> Result<BandwidthOptions,Error>
	{
		let mut amount=None;
		let mut offset=0;
		match_object!(cv,"Bandwidth",value,
			"amount" => amount=Some(value.as_usize().map_err(|e|e.with_message("bad value for amount".to_string()))?),
			"offset" => offset=value.as_usize().map_err(|e|e.with_message("bad value for offset".to_string()))?,
		);
		let amount=amount.ok_or_else(||cv.ill("There were no amount"))?;
		let options = BandwidthOptions{amount,offset};
		options.validate()?;
		Ok(options)
	}
	pub fn validate(&self) -> Result<(),Error>
	{
		if self.amount==0
		{
			return Err(error!(bad_argument,"bandwidth amount=0".to_string()).with_message("the range of bandwidths cannot be empty".to_string()));
		}
		Ok(())
	}
}

///Everything needed to generate a [TopologyInput].
#[derive(Debug,Clone,PartialEq)]
pub struct InputOptions
{
	pub hosts: usize,
	pub routers: usize,
	///Fewest ports of any router. The ports of all routers add up to the number of hosts.
	pub minimum_ports: usize,
	///Most ports of any router, if bounded.
	pub maximum_ports: Option<usize>,
	pub traffic: TrafficOptions,
	pub bandwidth: BandwidthOptions,
}

impl InputOptions
{
	///Check that an instance can be generated. This avoids the panics of the port distributor.
	pub fn validate(&self) -> Result<(),Error>
	{
		let complain = |text:String| -> Result<(),Error> { Err(error!(bad_argument,format!("hosts={} routers={} minimum_ports={} maximum_ports={:?}",self.hosts,self.routers,self.minimum_ports,self.maximum_ports)).with_message(text)) };
		if self.routers==0
		{
			return complain("there must be at least one router".to_string());
		}
		if self.routers>self.hosts
		{
			return complain("there cannot be more routers than hosts".to_string());
		}
		if self.minimum_ports*self.routers>self.hosts
		{
			return complain(format!("{} routers with {} ports need more than {} hosts",self.routers,self.minimum_ports,self.hosts));
		}
		if let Some(maximum_ports) = self.maximum_ports
		{
			if maximum_ports<self.minimum_ports
			{
				return complain("maximum_ports is lower than minimum_ports".to_string());
			}
			if maximum_ports*self.routers<self.hosts
			{
				return complain(format!("{} routers with {} ports cannot hold {} hosts",self.routers,maximum_ports,self.hosts));
			}
		}
		self.traffic.validate()?;
		self.bandwidth.validate()
	}
}

///Pre-generated topology data.
#[derive(Debug,Clone,PartialEq)]
pub struct TopologyInput
{
	pub hosts: usize,
	pub routers: usize,
	///Number of ports of each router.
	pub ports_count: Vec<usize>,
	///Traffic from each host to each other host. Single-sided.
	pub traffic_matrix: Matrix<usize>,
	///Bandwidth of the channel between each pair of routers.
	pub bandwidth_matrix: SymmetricalMatrix<usize>,
}

impl TopologyInput
{
	///Build an instance from explicit tables. Panics if the sizes do not match.
	pub fn new(ports_count:Vec<usize>, traffic_matrix:Matrix<usize>, bandwidth_matrix:SymmetricalMatrix<usize>) -> TopologyInput
	{
		let hosts = traffic_matrix.get_rows();
		let routers = ports_count.len();
		assert_eq!(traffic_matrix.get_columns(),hosts,"the traffic matrix must be square");
		assert_eq!(bandwidth_matrix.size(),routers,"the bandwidth matrix must have a row per router");
		assert!(routers>0 && routers<=hosts,"there must be between 1 and {} routers, got {}",hosts,routers);
		TopologyInput{hosts,routers,ports_count,traffic_matrix,bandwidth_matrix}
	}
	///Generate a random instance.
	pub fn generate(options:&InputOptions, random:&mut TopologyRandom) -> Result<TopologyInput,Error>
	{
		options.validate()?;
		let offset = ports::bounded_offset(options.routers,options.hosts,options.minimum_ports,options.maximum_ports);
		debug!("distributing {} ports over {} routers with offset {}",options.hosts,options.routers,offset);
		let ports_count = ports::random_distribution(options.routers,options.hosts,offset,random);
		let traffic_matrix = create_traffic_matrix(options.hosts,&options.traffic,random);
		let bandwidth_matrix = create_bandwidth_matrix(options.routers,&options.bandwidth,random);
		Ok(TopologyInput{
			hosts: options.hosts,
			routers: options.routers,
			ports_count,
			traffic_matrix,
			bandwidth_matrix,
		})
	}
}

impl Display for TopologyInput
{
	fn fmt(&self, f:&mut Formatter) -> fmt::Result
	{
		writeln!(f,"Ports: {}",self.ports_count.iter().sum::<usize>())?;
		writeln!(f,"  {}",self.ports_count.iter().enumerate().map(|(index,count)|format!("[{}]: {}",index,count)).join(" "))?;
		writeln!(f,"Traffic:")?;
		write!(f,"{}",self.traffic_matrix)?;
		writeln!(f,"Bandwidth:")?;
		write!(f,"{}",self.bandwidth_matrix)
	}
}

/**
Generate the one-sided traffic between hosts.
Each ordered pair of distinct hosts is non-zero with probability `non_zero_chance`, and then takes a volume in `[offset,offset+amount)`.
The diagonal is zero.
**/
pub fn create_traffic_matrix(hosts:usize, options:&TrafficOptions, random:&mut TopologyRandom) -> Matrix<usize>
{
	let mut matrix = Matrix::constant(0,hosts,hosts);
	for row in 0..hosts
	{
		for column in 0..hosts
		{
			if row==column
			{
				continue;
			}
			*matrix.get_mut(row,column) = if random.uniform() < options.non_zero_chance
			{
				random.index(options.amount) + options.offset
			}
			else
			{
				0
			};
		}
	}
	matrix
}

///Generate the bandwidth of the channels. Each pair of routers is drawn once, from `[offset,offset+amount)`.
pub fn create_bandwidth_matrix(routers:usize, options:&BandwidthOptions, random:&mut TopologyRandom) -> SymmetricalMatrix<usize>
{
	let mut matrix = SymmetricalMatrix::constant(0,routers);
	for row in 0..routers
	{
		for column in row+1..routers
		{
			matrix.set(row,column,random.index(options.amount) + options.offset);
		}
	}
	matrix
}
