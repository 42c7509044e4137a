use topoga_lib::config_parser::ConfigurationValue;

pub struct TrafficBuilder
{
    pub non_zero_chance: f64,
    pub amount: usize,
    pub offset: usize,
}

pub fn create_traffic(builder: TrafficBuilder) -> ConfigurationValue
{
    ConfigurationValue::Object("Traffic".to_string(), vec![
        ("non_zero_chance".to_string(), ConfigurationValue::Number(builder.non_zero_chance)),
        ("amount".to_string(), ConfigurationValue::Number(builder.amount as f64)),
        ("offset".to_string(), ConfigurationValue::Number(builder.offset as f64)),
    ])
}

pub fn create_bandwidth(amount: usize, offset: usize) -> ConfigurationValue
{
    ConfigurationValue::Object("Bandwidth".to_string(), vec![
        ("amount".to_string(), ConfigurationValue::Number(amount as f64)),
        ("offset".to_string(), ConfigurationValue::Number(offset as f64)),
    ])
}

pub struct ConfigurationBuilder
{
    pub random_seed: usize,
    pub hosts: usize,
    pub routers: usize,
    pub minimum_ports: usize,
    pub traffic: ConfigurationValue,
    pub bandwidth: ConfigurationValue,
    pub population_size: usize,
    pub mutation_probability: f64,
    pub maximum_generations: usize,
    ///Extra fields appended as they are.
    pub extra: Vec<(String, ConfigurationValue)>,
}

impl ConfigurationBuilder
{
    ///A small run that finishes quickly.
    pub fn small(hosts: usize, routers: usize, minimum_ports: usize) -> ConfigurationBuilder
    {
        ConfigurationBuilder{
            random_seed: 42,
            hosts,
            routers,
            minimum_ports,
            traffic: create_traffic(TrafficBuilder{ non_zero_chance: 0.5, amount: 4500, offset: 500 }),
            bandwidth: create_bandwidth(20000, 3000),
            population_size: 10,
            mutation_probability: 0.01,
            maximum_generations: 20,
            extra: vec![],
        }
    }
}

pub fn create_configuration(builder: ConfigurationBuilder) -> ConfigurationValue
{
    let mut fields = vec![
        ("random_seed".to_string(), ConfigurationValue::Number(builder.random_seed as f64)),
        ("hosts".to_string(), ConfigurationValue::Number(builder.hosts as f64)),
        ("routers".to_string(), ConfigurationValue::Number(builder.routers as f64)),
        ("minimum_ports".to_string(), ConfigurationValue::Number(builder.minimum_ports as f64)),
        ("traffic".to_string(), builder.traffic),
        ("bandwidth".to_string(), builder.bandwidth),
        ("population_size".to_string(), ConfigurationValue::Number(builder.population_size as f64)),
        ("mutation_probability".to_string(), ConfigurationValue::Number(builder.mutation_probability)),
        ("termination".to_string(), ConfigurationValue::Object("OptimalFitness".to_string(), vec![
            ("maximum_generations".to_string(), ConfigurationValue::Number(builder.maximum_generations as f64)),
        ])),
    ];
    fields.extend(builder.extra);
    ConfigurationValue::Object("Configuration".to_string(), fields)
}
