use rayon::prelude::*;
use std::path::Path;

use crate::building::SectionBuilder;
use crate::error::StyleguideError;
use crate::models::{ParseOptions, Section};
use crate::parsing::{
    BlockExtractor, CmarkRenderer, CommentParser, EscapedText, KssCommentParser, KssSplitter,
    MarkdownRenderer, ParamExtractor, PrefixedParams, RawBlock,
};
use crate::reference;

/// One stylesheet handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    /// Lower-cased file extension, empty when there is none.
    pub fn syntax(&self) -> String {
        Path::new(&self.path)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// Builds every section of a set of files and resolves their references.
pub struct Pipeline {
    options: ParseOptions,
    extractor: Box<dyn BlockExtractor>,
    parser: Box<dyn CommentParser>,
    params: Box<dyn ParamExtractor>,
    markdown: Box<dyn MarkdownRenderer>,
}

impl Pipeline {
    /// Pipeline wired with the KSS collaborators.
    pub fn new(options: ParseOptions) -> Self {
        let params = PrefixedParams::new(options.param_prefix.clone());
        let markdown: Box<dyn MarkdownRenderer> = if options.markdown {
            Box::new(CmarkRenderer)
        } else {
            Box::new(EscapedText)
        };
        Self {
            options,
            extractor: Box::new(KssSplitter),
            parser: Box::new(KssCommentParser),
            params: Box::new(params),
            markdown,
        }
    }

    pub fn with_extractor(mut self, extractor: impl BlockExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_parser(mut self, parser: impl CommentParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn with_params(mut self, params: impl ParamExtractor + 'static) -> Self {
        self.params = Box::new(params);
        self
    }

    pub fn with_markdown(mut self, markdown: impl MarkdownRenderer + 'static) -> Self {
        self.markdown = Box::new(markdown);
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Build, merge, sort and number the sections of `files`.
    ///
    /// Files keep the order given here and blocks keep their order within a
    /// file; that merge order breaks ties in the sort. Any failure aborts the
    /// whole build.
    pub fn run(&self, files: &[SourceFile]) -> Result<Vec<Section>, StyleguideError> {
        let merged = self.build_sections(files)?;
        log::info!(
            "Built {} sections from {} files",
            merged.len(),
            files.len()
        );
        reference::resolve_owned(merged)
    }

    /// Build every block of every file concurrently, without resolving.
    pub fn build_sections(&self, files: &[SourceFile]) -> Result<Vec<Section>, StyleguideError> {
        let blocks: Vec<(usize, String, Vec<RawBlock>)> = files
            .par_iter()
            .enumerate()
            .map(|(index, file)| {
                let syntax = file.syntax();
                let blocks = self.extractor.extract(&file.contents, &syntax);
                log::debug!("{}: {} KSS blocks", file.path, blocks.len());
                (index, syntax, blocks)
            })
            .collect();

        let tasks: Vec<(usize, usize, &RawBlock)> = blocks
            .iter()
            .flat_map(|(file, _, file_blocks)| {
                file_blocks
                    .iter()
                    .enumerate()
                    .map(move |(block, raw)| (*file, block, raw))
            })
            .collect();

        let builder = SectionBuilder::new(
            &self.options,
            self.parser.as_ref(),
            self.params.as_ref(),
            self.markdown.as_ref(),
        );

        // Ordered collect into Result: joins every task, stops at the first error
        let built: Vec<Option<Section>> = tasks
            .par_iter()
            .map(|&(file, block, raw)| -> Result<Option<Section>, StyleguideError> {
                let source = &files[file];
                let mut section = builder.build(raw).map_err(|source_err| {
                    StyleguideError::BlockParse {
                        file: source.path.clone(),
                        block,
                        source: source_err,
                    }
                })?;
                if let Some(section) = section.as_mut() {
                    section.file = source.path.clone();
                    section.syntax = blocks[file].1.clone();
                }
                Ok(section)
            })
            .collect::<Result<_, StyleguideError>>()?;

        Ok(built.into_iter().flatten().collect())
    }
}
