pub mod bedrock_kb;
